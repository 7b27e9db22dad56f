//! Binds per-field UI configuration to the controls of a form.
//!
//! The binder aggregates configuration with a form reference and nothing
//! else: it never validates. Bindings borrow both the configuration and the
//! form, so they cannot outlive the dialog that owns them.

use indexmap::IndexMap;
use serde::Serialize;

use crate::forms::control::{FieldValue, FormControl, FormGroup};

/// UI-facing configuration of one field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldConfig {
    pub label: String,
    pub placeholder: Option<String>,
    pub is_required: bool,
    pub disable: bool,
    pub enable_textarea: bool,
    pub form_control_name: &'static str,
}

impl FieldConfig {
    pub fn new(label: impl Into<String>, form_control_name: &'static str) -> Self {
        Self {
            label: label.into(),
            form_control_name,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    #[must_use]
    pub fn textarea(mut self) -> Self {
        self.enable_textarea = true;
        self
    }
}

/// Field configuration registered under the key the dialog looks it up by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub config: FieldConfig,
}

impl FieldSpec {
    pub fn new(key: &'static str, config: FieldConfig) -> Self {
        Self { key, config }
    }
}

/// Configuration joined with the form it reads control state from.
#[derive(Clone, Copy, Debug)]
pub struct FieldBinding<'f> {
    pub config: &'f FieldConfig,
    pub form_group: &'f FormGroup,
}

impl<'f> FieldBinding<'f> {
    /// The bound control, `None` when the form has no control under that name.
    pub fn control(&self) -> Option<&'f FormControl> {
        self.form_group.get(self.config.form_control_name)
    }

    pub fn has_error(&self, code: &str) -> bool {
        self.control().is_some_and(|control| control.has_error(code))
    }

    pub fn is_required(&self) -> bool {
        self.config.is_required
    }

    pub fn is_disabled(&self) -> bool {
        self.control().is_some_and(FormControl::is_disabled)
    }

    pub fn value(&self) -> FieldValue {
        self.control()
            .map(|control| control.value().clone())
            .unwrap_or_default()
    }
}

/// Binds every spec to `form`, keyed and ordered as given.
pub fn bind_fields<'f>(
    fields: &'f [FieldSpec],
    form: &'f FormGroup,
) -> IndexMap<&'static str, FieldBinding<'f>> {
    fields
        .iter()
        .map(|field| {
            (
                field.key,
                FieldBinding {
                    config: &field.config,
                    form_group: form,
                },
            )
        })
        .collect()
}
