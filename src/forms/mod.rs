//! Form model, field binding and the student form definition.

use thiserror::Error;
use validator::ValidationErrors;

pub mod binder;
pub mod control;
pub mod student;
#[cfg(feature = "server")]
pub mod upload;
pub mod validators;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidDate(String),

    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("failed to read uploaded file: {0}")]
    Upload(String),
}
