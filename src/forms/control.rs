//! Reactive form model: controls, per-control validators and group rules.
//!
//! A [`FormGroup`] owns named [`FormControl`]s. Every change re-runs
//! validation: each control recomputes its own errors from its validators,
//! then the group-level rules run and may flag individual controls.
//! Errors are carried as [`validator::ValidationError`] values keyed by code.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use validator::{ValidateEmail, ValidationError};

use crate::domain::types::DATE_FORMAT;

pub const REQUIRED: &str = "required";
pub const EMAIL: &str = "email";
pub const MIN_LENGTH: &str = "minlength";

/// Value held by a control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    /// `Empty` for `None` and `""`, `Text` otherwise.
    pub fn text(value: Option<impl Into<String>>) -> Self {
        match value.map(Into::into) {
            Some(text) if !text.is_empty() => Self::Text(text),
            _ => Self::Empty,
        }
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Empty, Self::Date)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Date(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Rendered form of the value, as an input element would show it.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Date(date) => date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Rule evaluated against a single control's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validator {
    Required,
    Email,
    MinLength(usize),
}

impl Validator {
    fn check(&self, value: &FieldValue) -> Option<ValidationError> {
        match self {
            Self::Required if value.is_empty() => Some(ValidationError::new(REQUIRED)),
            Self::Required => None,
            Self::Email => value
                .as_text()
                .filter(|text| !text.validate_email())
                .map(|_| ValidationError::new(EMAIL)),
            Self::MinLength(required) => {
                let actual = value.as_text()?.chars().count();
                if actual >= *required {
                    return None;
                }
                let mut error = ValidationError::new(MIN_LENGTH);
                error.add_param(Cow::from("requiredLength"), required);
                error.add_param(Cow::from("actualLength"), &actual);
                Some(error)
            }
        }
    }
}

/// Form-level rule that can inspect and flag any control of the group.
pub trait GroupValidator: Send + Sync {
    fn validate(&self, form: &mut FormGroup) -> Option<ValidationError>;
}

/// Single named input within a [`FormGroup`].
#[derive(Clone, Debug, Default)]
pub struct FormControl {
    value: FieldValue,
    validators: Vec<Validator>,
    errors: Vec<ValidationError>,
    disabled: bool,
    touched: bool,
}

impl FormControl {
    pub fn new(validators: Vec<Validator>) -> Self {
        Self {
            validators,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn error(&self, code: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.code == code)
    }

    pub fn has_error(&self, code: &str) -> bool {
        self.error(code).is_some()
    }

    /// Disabled controls are skipped by validation but kept in the raw value.
    pub fn is_valid(&self) -> bool {
        self.disabled || self.errors.is_empty()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Adds `error` unless an error with the same code is already present.
    pub fn set_error(&mut self, error: ValidationError) {
        if !self.has_error(&error.code) {
            self.errors.push(error);
        }
    }

    fn run_validators(&mut self) {
        self.errors = if self.disabled {
            Vec::new()
        } else {
            self.validators
                .iter()
                .filter_map(|validator| validator.check(&self.value))
                .collect()
        };
    }
}

/// Named controls plus the group-level rules spanning them.
#[derive(Clone, Default)]
pub struct FormGroup {
    controls: IndexMap<&'static str, FormControl>,
    validators: Vec<Arc<dyn GroupValidator>>,
    errors: Vec<ValidationError>,
}

impl std::fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormGroup")
            .field("controls", &self.controls)
            .field("validators", &self.validators.len())
            .field("errors", &self.errors)
            .finish()
    }
}

impl FormGroup {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_control(mut self, name: &'static str, control: FormControl) -> Self {
        self.controls.insert(name, control);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl GroupValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormControl> {
        self.controls.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormControl> {
        self.controls.get_mut(name)
    }

    pub fn controls(&self) -> impl Iterator<Item = (&'static str, &FormControl)> {
        self.controls.iter().map(|(name, control)| (*name, control))
    }

    /// Form-level errors reported by the group rules.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_error(&self, code: &str) -> bool {
        self.errors.iter().any(|error| error.code == code)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.controls.values().all(FormControl::is_valid)
    }

    /// Names of controls currently carrying errors.
    pub fn invalid_controls(&self) -> Vec<&'static str> {
        self.controls
            .iter()
            .filter(|(_, control)| !control.is_valid())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Sets one control's value and re-validates; unknown names are ignored.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        if let Some(control) = self.controls.get_mut(name) {
            control.value = value;
        }
        self.validate();
    }

    /// Sets every listed control that exists, then re-validates once.
    pub fn patch_value<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (&'static str, FieldValue)>,
    {
        for (name, value) in values {
            if let Some(control) = self.controls.get_mut(name) {
                control.value = value;
            }
        }
        self.validate();
    }

    /// Clears every value and touched flag, then re-validates.
    pub fn reset(&mut self) {
        for control in self.controls.values_mut() {
            control.value = FieldValue::Empty;
            control.touched = false;
        }
        self.validate();
    }

    pub fn disable(&mut self, name: &str) {
        if let Some(control) = self.controls.get_mut(name) {
            control.disabled = true;
        }
        self.validate();
    }

    pub fn mark_all_as_touched(&mut self) {
        for control in self.controls.values_mut() {
            control.touched = true;
        }
    }

    /// Values of every control, disabled ones included.
    pub fn raw_value(&self) -> IndexMap<&'static str, FieldValue> {
        self.controls
            .iter()
            .map(|(name, control)| (*name, control.value.clone()))
            .collect()
    }

    /// Recomputes control errors, then applies the group rules.
    pub fn validate(&mut self) {
        for control in self.controls.values_mut() {
            control.run_validators();
        }
        let validators = self.validators.clone();
        self.errors = validators
            .iter()
            .filter_map(|validator| validator.validate(self))
            .collect();
    }
}

/// Typed mapping between a DTO and the controls of its form.
pub trait FormModel: Sized {
    /// Control values describing `self`.
    fn form_values(&self) -> Vec<(&'static str, FieldValue)>;

    /// Rebuilds the DTO from the form's raw value.
    fn from_form(form: &FormGroup) -> Self;
}
