//! Response envelope wrapping every backend reply.

use serde::{Deserialize, Deserializer, Serialize};

/// Structured error reported by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// `{succeeded, responseMessage, errors, data}` wrapper returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto<T> {
    pub succeeded: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ErrorDto>,
    pub data: Option<T>,
}

/// Business failure extracted from an envelope with `succeeded: false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseFailure {
    /// Code of the first structured error, absent when the backend sent none.
    pub code: Option<String>,
    /// Description of the first structured error, else the envelope message.
    pub message: String,
}

impl<T> ResponseDto<T> {
    /// Failed envelope carrying only a top-level message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            response_message: message.into(),
            errors: Vec::new(),
            data: None,
        }
    }

    /// Appends a structured error.
    #[must_use]
    pub fn with_error(mut self, code: impl Into<String>, description: impl Into<String>) -> Self {
        self.errors.push(ErrorDto {
            code: code.into(),
            description: description.into(),
        });
        self
    }

    /// Returns the failure to surface, or `None` when the call succeeded.
    pub fn failure(&self) -> Option<ResponseFailure> {
        if self.succeeded {
            return None;
        }
        Some(match self.errors.first() {
            Some(error) => ResponseFailure {
                code: Some(error.code.clone()),
                message: error.description.clone(),
            },
            None => ResponseFailure {
                code: None,
                message: self.response_message.clone(),
            },
        })
    }

    /// Converts the envelope into its payload, hiding `data` on failure.
    ///
    /// A successful envelope without `data` yields `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, ResponseFailure> {
        match self.failure() {
            Some(failure) => Err(failure),
            None => Ok(self.data),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
