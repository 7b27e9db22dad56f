use serde::Serialize;

/// Answer given to the delete prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Dismissed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Dismissed
        }
    }
}

/// Render state of the delete prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteConfirmationView {
    pub title: String,
    pub message: String,
}

impl DeleteConfirmationView {
    pub fn new(subject: &str) -> Self {
        Self {
            title: "Delete record".to_string(),
            message: format!("Are you sure you want to delete {subject}?"),
        }
    }
}
