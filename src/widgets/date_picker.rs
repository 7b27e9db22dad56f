use serde::Serialize;

use crate::forms::binder::FieldBinding;
use crate::forms::control::REQUIRED;
use crate::forms::validators::DATE_RANGE_INVALID;

/// Render state of a date input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatePickerView {
    pub name: &'static str,
    pub label: String,
    /// `YYYY-MM-DD`, empty when unset.
    pub value: String,
    pub required: bool,
    pub show_errors: bool,
    pub required_error: bool,
    pub invalid_dob: bool,
}

impl DatePickerView {
    pub fn new(binding: &FieldBinding<'_>) -> Self {
        Self {
            name: binding.config.form_control_name,
            label: binding.config.label.clone(),
            value: binding.value().display(),
            required: binding.is_required(),
            show_errors: binding.control().is_some_and(|control| control.is_touched()),
            required_error: binding.has_error(REQUIRED),
            invalid_dob: binding.has_error(DATE_RANGE_INVALID),
        }
    }
}
