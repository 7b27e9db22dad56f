use std::sync::Mutex;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::client::EntityClient;
use crate::client::http::ReqwestTransport;
use crate::domain::types::StudentId;
use crate::dto::views::InfoPageData;
use crate::forms::upload::StudentMultipartForm;
use crate::models::config::ServerConfig;
use crate::notifications::Notification;
use crate::routes::{base_context, flash, lock_grid, redirect, render_template};
use crate::services::ServiceError;
use crate::services::delete::DeleteFlow;
use crate::services::dialog::{DialogMode, StudentDialog, SubmitOutcome, dialog_mode};
use crate::services::grid::StudentGrid;
use crate::widgets::delete_confirmation::Confirmation;

fn render_dialog(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    toasts: &[Notification],
    dialog: &StudentDialog,
) -> HttpResponse {
    let mut context = base_context(flash_messages, toasts, "student");
    context.insert("dialog", &dialog.view());
    render_template(tera, "student/dialog.html", &context)
}

/// Maps a lookup failure to the redirect shown to the user.
fn lookup_failed(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound | ServiceError::TypeConstraint(_) => {
            FlashMessage::error("Student not found.").send();
            redirect("/")
        }
        ServiceError::NoSelection => {
            FlashMessage::error("Select a student first.").send();
            redirect("/")
        }
        err => {
            log::error!("Failed to look up the student: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn find_student(grid: &Mutex<StudentGrid>, id: String) -> Result<DialogMode, ServiceError> {
    let id = StudentId::new(id)?;
    let grid = lock_grid(grid)?;
    dialog_mode(&grid, Some(&id))
}

#[get("/student/new")]
pub async fn new_student(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let dialog = StudentDialog::open(
        DialogMode::Add,
        server_config.validation.date_of_birth_cutoff,
    );
    render_dialog(&tera, &flash_messages, &[], &dialog)
}

#[get("/student/{student_id}/edit")]
pub async fn edit_student(
    student_id: web::Path<String>,
    grid: web::Data<Mutex<StudentGrid>>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match find_student(&grid, student_id.into_inner()) {
        Ok(mode) => {
            let dialog = StudentDialog::open(mode, server_config.validation.date_of_birth_cutoff);
            render_dialog(&tera, &flash_messages, &[], &dialog)
        }
        Err(err) => lookup_failed(err),
    }
}

#[post("/student/save")]
pub async fn save_student(
    MultipartForm(form): MultipartForm<StudentMultipartForm>,
    grid: web::Data<Mutex<StudentGrid>>,
    client: web::Data<EntityClient<ReqwestTransport>>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let clear = form.requests_clear();
    let (input, image) = match web::block(move || form.into_parts()).await {
        Ok(Ok(parts)) => parts,
        Ok(Err(err)) => {
            log::error!("Failed to read the student form: {err}");
            FlashMessage::error("Failed to read the submitted form.").send();
            return redirect("/");
        }
        Err(err) => {
            log::error!("Student form reader did not complete: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let id = input.student_id();
    let mode = match lock_grid(&grid).and_then(|grid| dialog_mode(&grid, id.as_ref())) {
        Ok(mode) => mode,
        Err(err) => return lookup_failed(err),
    };
    let mut dialog = StudentDialog::open(mode, server_config.validation.date_of_birth_cutoff);
    if clear {
        dialog.clear();
        return render_dialog(&tera, &flash_messages, &[], &dialog);
    }
    let mut toasts: Vec<Notification> = Vec::new();

    match input.into_values() {
        Ok(values) => dialog.apply_input(values),
        Err(err) => {
            log::warn!("Rejected student form: {err}");
            toasts.push(Notification::error(
                err.to_string(),
                Some("Invalid input".to_string()),
            ));
            return render_dialog(&tera, &flash_messages, &toasts, &dialog);
        }
    }
    if let Some(image) = image {
        if let Err(err) = dialog.select_image(image) {
            toasts.push(Notification::error(
                err.to_string(),
                Some("Invalid image".to_string()),
            ));
            return render_dialog(&tera, &flash_messages, &toasts, &dialog);
        }
    }

    match dialog.submit(client.get_ref(), &mut toasts).await {
        SubmitOutcome::Succeeded(transaction) => {
            match lock_grid(&grid) {
                Ok(mut grid) => grid.apply_transaction(transaction),
                Err(err) => {
                    log::error!("Failed to update the student grid: {err}");
                    return HttpResponse::InternalServerError().finish();
                }
            }
            flash(toasts);
            redirect("/")
        }
        SubmitOutcome::Blocked | SubmitOutcome::Failed => {
            render_dialog(&tera, &flash_messages, &toasts, &dialog)
        }
        SubmitOutcome::Cancelled => redirect("/"),
    }
}

#[get("/student/{student_id}/info")]
pub async fn student_info(
    student_id: web::Path<String>,
    grid: web::Data<Mutex<StudentGrid>>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match find_student(&grid, student_id.into_inner()) {
        Ok(DialogMode::Edit(student)) => {
            let mut context = base_context(&flash_messages, &[], "student");
            context.insert("info", &InfoPageData::from(&student));
            render_template(&tera, "student/info.html", &context)
        }
        Ok(DialogMode::Add) => lookup_failed(ServiceError::NotFound),
        Err(err) => lookup_failed(err),
    }
}

fn start_delete(grid: &Mutex<StudentGrid>, id: String) -> Result<DeleteFlow, ServiceError> {
    let id = StudentId::new(id)?;
    let mut grid = lock_grid(grid)?;
    grid.select(Some(&id));
    DeleteFlow::start(&grid)
}

#[get("/student/{student_id}/delete")]
pub async fn confirm_delete(
    student_id: web::Path<String>,
    grid: web::Data<Mutex<StudentGrid>>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match start_delete(&grid, student_id.into_inner()) {
        Ok(mut flow) => {
            let mut context = base_context(&flash_messages, &[], "student");
            context.insert("prompt", &flow.prompt());
            context.insert("student_id", &student_id_of(&flow));
            render_template(&tera, "student/delete.html", &context)
        }
        Err(err) => lookup_failed(err),
    }
}

fn student_id_of(flow: &DeleteFlow) -> Option<String> {
    flow.record().id.as_ref().map(|id| id.as_str().to_string())
}

#[derive(Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirmed: bool,
}

#[post("/student/{student_id}/delete")]
pub async fn delete_student(
    student_id: web::Path<String>,
    grid: web::Data<Mutex<StudentGrid>>,
    client: web::Data<EntityClient<ReqwestTransport>>,
    web::Form(form): web::Form<DeleteForm>,
) -> impl Responder {
    let mut flow = match start_delete(&grid, student_id.into_inner()) {
        Ok(flow) => flow,
        Err(err) => return lookup_failed(err),
    };

    let mut toasts: Vec<Notification> = Vec::new();
    let answer = Confirmation::from(form.confirmed);
    if let Some(transaction) = flow.resolve(answer, client.get_ref(), &mut toasts).await {
        match lock_grid(&grid) {
            Ok(mut grid) => grid.apply_transaction(transaction),
            Err(err) => {
                log::error!("Failed to update the student grid: {err}");
                return HttpResponse::InternalServerError().finish();
            }
        }
    }
    flash(toasts);
    redirect("/")
}
