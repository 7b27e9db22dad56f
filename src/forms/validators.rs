//! Cross-field rules for the student form.

use chrono::NaiveDate;
use validator::ValidationError;

use crate::forms::control::{FormGroup, GroupValidator};

/// Error code raised for birth dates later than the cutoff.
pub const DATE_RANGE_INVALID: &str = "dateRangeInvalid";

/// February 1, 2014.
pub fn default_date_of_birth_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 2, 1).unwrap_or_default()
}

/// Rejects a date control whose value is strictly later than `cutoff`.
///
/// The offending control is flagged with [`DATE_RANGE_INVALID`] and the same
/// code is reported at form level. Nothing is cleared when the rule passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRangeValidator {
    control: &'static str,
    cutoff: NaiveDate,
}

impl DateRangeValidator {
    pub fn new(control: &'static str, cutoff: NaiveDate) -> Self {
        Self { control, cutoff }
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }
}

impl GroupValidator for DateRangeValidator {
    fn validate(&self, form: &mut FormGroup) -> Option<ValidationError> {
        let control = form.get_mut(self.control)?;
        let value = control.value().as_date()?;
        if value <= self.cutoff {
            return None;
        }
        control.set_error(ValidationError::new(DATE_RANGE_INVALID));
        Some(ValidationError::new(DATE_RANGE_INVALID))
    }
}
