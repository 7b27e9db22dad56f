use std::sync::{Mutex, MutexGuard};

use actix_web::{HttpResponse, http::header};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::notifications::{self, Notification};
use crate::services::grid::StudentGrid;
use crate::services::{ServiceError, ServiceResult};

pub mod main;
pub mod student;

/// Alert shown at the top of a rendered page.
#[derive(Debug, Serialize)]
pub struct Alert {
    pub message: String,
    pub level: &'static str,
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

fn notification_level_to_str(level: notifications::Level) -> &'static str {
    match level {
        notifications::Level::Success => "success",
        notifications::Level::Error => "danger",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: incoming flash alerts plus `toasts` raised
/// while handling this request.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    toasts: &[Notification],
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| Alert {
            message: f.content().to_string(),
            level: alert_level_to_str(&f.level()),
        })
        .chain(toasts.iter().map(|toast| Alert {
            message: toast.text(),
            level: notification_level_to_str(toast.level),
        }))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Queues `toasts` for the page the client is redirected to.
pub fn flash(toasts: Vec<Notification>) {
    for toast in toasts {
        match toast.level {
            notifications::Level::Success => FlashMessage::success(toast.text()).send(),
            notifications::Level::Error => FlashMessage::error(toast.text()).send(),
        }
    }
}

pub fn lock_grid(grid: &Mutex<StudentGrid>) -> ServiceResult<MutexGuard<'_, StudentGrid>> {
    grid.lock()
        .map_err(|err| ServiceError::Internal(format!("student grid lock poisoned: {err}")))
}
