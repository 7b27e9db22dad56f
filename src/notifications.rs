//! Toast notifications raised by the services.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: Option<String>,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>, title: Option<String>) -> Self {
        Self {
            level: Level::Error,
            title,
            message: message.into(),
        }
    }

    /// Single-line form used by flash messages: `title: message`.
    pub fn text(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => format!("{title}: {}", self.message),
            _ => self.message.clone(),
        }
    }
}

/// Sink receiving notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
