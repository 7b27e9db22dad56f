//! Text input widget.

use serde::Serialize;

use crate::forms::binder::{FieldBinding, FieldConfig};
use crate::forms::control::{FormGroup, MIN_LENGTH, REQUIRED};

/// Error code raised by "must match" style rules.
pub const MATCHING: &str = "matching";

/// Applies the configuration's `disable` flag to the bound control.
pub fn initialize(config: &FieldConfig, form: &mut FormGroup) {
    if config.disable {
        form.disable(config.form_control_name);
    }
}

/// Render state of a text input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextFieldView {
    pub name: &'static str,
    pub label: String,
    pub placeholder: String,
    pub value: String,
    pub required: bool,
    pub disabled: bool,
    pub textarea: bool,
    /// Errors are only shown once the control has been touched.
    pub show_errors: bool,
    pub required_error: bool,
    pub mismatch: bool,
    pub min_length: Option<u64>,
    pub min_length_error: bool,
}

impl TextFieldView {
    pub fn new(binding: &FieldBinding<'_>) -> Self {
        let control = binding.control();
        let min_length = control.and_then(|control| control.error(MIN_LENGTH));
        let length_param = |name: &str| {
            min_length
                .and_then(|error| error.params.get(name))
                .and_then(serde_json::Value::as_u64)
        };
        let required_length = length_param("requiredLength");
        let actual_length = length_param("actualLength");

        Self {
            name: binding.config.form_control_name,
            label: binding.config.label.clone(),
            placeholder: binding.config.placeholder.clone().unwrap_or_default(),
            value: binding.value().display(),
            required: binding.is_required(),
            disabled: binding.is_disabled(),
            textarea: binding.config.enable_textarea,
            show_errors: control.is_some_and(|control| control.is_touched()),
            required_error: binding.has_error(REQUIRED),
            mismatch: binding.has_error(MATCHING),
            min_length: required_length,
            min_length_error: matches!(
                (required_length, actual_length),
                (Some(required), Some(actual)) if required > actual
            ),
        }
    }
}
