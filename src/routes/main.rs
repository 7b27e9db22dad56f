use std::sync::Mutex;

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::client::EntityClient;
use crate::client::http::ReqwestTransport;
use crate::domain::types::StudentId;
use crate::dto::views::IndexPageData;
use crate::notifications::Notification;
use crate::routes::{base_context, flash, lock_grid, redirect, render_template};
use crate::services::grid::{StudentGrid, load_students};

#[derive(Deserialize)]
struct IndexQueryParams {
    q: Option<String>,
    selected: Option<String>,
}

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQueryParams>,
    grid: web::Data<Mutex<StudentGrid>>,
    client: web::Data<EntityClient<ReqwestTransport>>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let mut toasts: Vec<Notification> = Vec::new();

    let loaded = match lock_grid(&grid) {
        Ok(grid) => grid.is_loaded(),
        Err(err) => {
            log::error!("Failed to read the student grid: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    let rows = if loaded {
        None
    } else {
        load_students(client.get_ref(), &mut toasts).await
    };

    let data = match lock_grid(&grid) {
        Ok(mut grid) => {
            if let Some(rows) = rows {
                grid.set_rows(rows);
            }
            if let Some(q) = params.q {
                grid.set_quick_filter(q.trim());
            }
            let selected = params.selected.and_then(|id| StudentId::new(id).ok());
            grid.select(selected.as_ref());
            IndexPageData::from_grid(&grid)
        }
        Err(err) => {
            log::error!("Failed to update the student grid: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &toasts, "index");
    context.insert("grid", &data);
    render_template(&tera, "main/index.html", &context)
}

#[post("/refresh")]
pub async fn refresh(
    grid: web::Data<Mutex<StudentGrid>>,
    client: web::Data<EntityClient<ReqwestTransport>>,
) -> impl Responder {
    let mut toasts: Vec<Notification> = Vec::new();
    if let Some(rows) = load_students(client.get_ref(), &mut toasts).await {
        match lock_grid(&grid) {
            Ok(mut grid) => grid.set_rows(rows),
            Err(err) => {
                log::error!("Failed to update the student grid: {err}");
                return HttpResponse::InternalServerError().finish();
            }
        }
    }
    flash(toasts);
    redirect("/")
}
