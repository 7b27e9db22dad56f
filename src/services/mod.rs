//! Orchestration of the grid and dialog workflows.

use thiserror::Error;

use crate::client::ClientError;
use crate::domain::types::TypeConstraintError;
use crate::dto::response::ResponseFailure;
use crate::forms::FormError;
use crate::notifications::Notification;

pub mod delete;
pub mod dialog;
pub mod grid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("no record is selected")]
    NoSelection,

    #[error("record not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Title used when a failed save carries no structured error.
pub const SAVE_FAILED: &str = "Save Failed";

/// Toast for a business failure: first error code as title, else [`SAVE_FAILED`].
pub(crate) fn failure_notification(failure: ResponseFailure) -> Notification {
    let title = failure.code.unwrap_or_else(|| SAVE_FAILED.to_string());
    Notification::error(failure.message, Some(title))
}

/// Toast for a request that never produced an envelope.
pub(crate) fn transport_notification(err: &ClientError) -> Notification {
    Notification::error(err.message(), Some(err.name().to_string()))
}
