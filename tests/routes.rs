mod common;

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::cookie::Key;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use serde_json::json;
use tera::Tera;

use student_admin::client::EntityClient;
use student_admin::client::http::ReqwestTransport;
use student_admin::domain::types::StudentId;
use student_admin::models::config::{ServerConfig, ValidationConfig};
use student_admin::routes::alert_level_to_str;
use student_admin::routes::main::{refresh, show_index};
use student_admin::routes::student::{
    confirm_delete, delete_student, edit_student, new_student, save_student, student_info,
};
use student_admin::services::grid::StudentGrid;

const BOUNDARY: &str = "student-admin-test-boundary";

fn test_config(base: &str) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        secret: "0".repeat(64),
        templates_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*").into(),
        rest_base: base.into(),
        asset_base: base.into(),
        endpoints: HashMap::new(),
        validation: ValidationConfig::default(),
    }
}

macro_rules! init_app {
    ($base:expr, $grid:expr) => {{
        let config = test_config($base);
        let tera = Tera::new(&config.templates_dir).unwrap();
        let client = EntityClient::new(ReqwestTransport::new(), config.endpoint_map());
        let store = CookieMessageStore::builder(Key::generate()).build();
        test::init_service(
            App::new()
                .wrap(FlashMessagesFramework::builder(store).build())
                .service(show_index)
                .service(refresh)
                .service(new_student)
                .service(edit_student)
                .service(save_student)
                .service(student_info)
                .service(confirm_delete)
                .service(delete_student)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(client))
                .app_data($grid.clone())
                .app_data(web::Data::new(config)),
        )
        .await
    }};
}

fn text_parts(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body
}

fn finish(mut body: String) -> (String, Vec<u8>) {
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    (
        format!("multipart/form-data; boundary={BOUNDARY}"),
        body.into_bytes(),
    )
}

fn multipart(fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    finish(text_parts(fields))
}

/// Body a browser posts from the dialog when no image is chosen.
fn browser_multipart(fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let mut body = text_parts(fields);
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\r\n"
    ));
    body.push_str(&text_parts(&[("imageLastModified", "")]));
    finish(body)
}

fn new_student_fields(email: &str) -> Vec<(&str, &str)> {
    vec![
        ("firstName", "Grace"),
        ("lastName", "Hopper"),
        ("email", email),
        ("dateOfBirth", "2003-01-01"),
        ("nicNumber", "031234567V"),
    ]
}

fn grid() -> web::Data<Mutex<StudentGrid>> {
    web::Data::new(Mutex::new(StudentGrid::new()))
}

fn id(value: &str) -> StudentId {
    StudentId::new(value).unwrap()
}

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn index_loads_rows_on_first_visit() {
    let (base, _backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("First Name"));
    assert!(body.contains("Lovelace"));
    assert!(body.contains("Turing"));
    assert!(body.contains("Click for more information about Ada"));
    assert_eq!(grid.lock().unwrap().rows().len(), 2);
}

#[actix_web::test]
async fn quick_filter_narrows_the_rows() {
    let (base, _backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);

    let req = test::TestRequest::get().uri("/?q=turing").to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("Alan"));
    assert!(!body.contains("Lovelace"));
}

#[actix_web::test]
async fn edit_dialog_is_prefilled_from_the_grid() {
    let (base, _backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let req = test::TestRequest::get().uri("/student/1/edit").to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("<h1 class=\"h3 mb-3\">Edit</h1>"));
    assert!(body.contains("value=\"Ada\""));
    assert!(body.contains("value=\"2001-05-04\""));
}

#[actix_web::test]
async fn unknown_student_redirects_home() {
    let (base, _backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);

    let req = test::TestRequest::get().uri("/student/404/edit").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_web::test]
async fn saving_a_new_student_adds_one_row() {
    let (base, backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    let (content_type, body) = multipart(&new_student_fields("grace@example.com"));

    let req = test::TestRequest::post()
        .uri("/student/save")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let saved = backend.saved();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].get("id").is_none());
    assert_eq!(saved[0]["dateOfBirth"], json!("2003-01-01"));
    let grid = grid.lock().unwrap();
    assert_eq!(grid.rows().len(), 1);
    assert!(grid.find(&id("99")).is_some());
}

#[actix_web::test]
async fn browser_form_without_an_image_is_saved() {
    let (base, backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    let mut fields = new_student_fields("grace@example.com");
    fields.push(("action", "save"));
    let (content_type, body) = browser_multipart(&fields);

    let req = test::TestRequest::post()
        .uri("/student/save")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let saved = backend.saved();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].get("imageUrl").is_none());
    assert!(backend.uploads().is_empty());
    assert_eq!(grid.lock().unwrap().rows().len(), 1);
}

#[actix_web::test]
async fn clear_empties_the_edit_form() {
    let (base, backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let (content_type, body) = browser_multipart(&[
        ("id", "1"),
        ("firstName", "Ada"),
        ("lastName", "Lovelace"),
        ("email", "ada@example.com"),
        ("dateOfBirth", "2001-05-04"),
        ("nicNumber", "991234567V"),
        ("action", "clear"),
    ]);

    let req = test::TestRequest::post()
        .uri("/student/save")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<h1 class=\"h3 mb-3\">Edit</h1>"));
    assert!(body.contains("name=\"id\" value=\"1\""));
    assert!(!body.contains("value=\"Ada\""));
    assert!(!body.contains("value=\"2001-05-04\""));
    assert!(!body.contains("is required"));
    assert!(backend.saved().is_empty());
}

#[actix_web::test]
async fn invalid_form_is_rerendered_without_a_request() {
    let (base, backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    let (content_type, body) = multipart(&[
        ("lastName", "Hopper"),
        ("email", "grace@example.com"),
        ("dateOfBirth", "2015-06-01"),
        ("nicNumber", "031234567V"),
    ]);

    let req = test::TestRequest::post()
        .uri("/student/save")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("First Name is required"));
    assert!(body.contains("Invalid date of birth"));
    assert!(backend.saved().is_empty());
}

#[actix_web::test]
async fn rejected_save_keeps_the_dialog_open() {
    let (base, _backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    let (content_type, body) = multipart(&new_student_fields(common::TAKEN_EMAIL));

    let req = test::TestRequest::post()
        .uri("/student/save")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("DuplicateEmail: Email already in use"));
    assert!(body.contains("value=\"Grace\""));
    assert!(grid.lock().unwrap().rows().is_empty());
}

#[actix_web::test]
async fn confirmed_delete_deactivates_and_removes_the_row() {
    let (base, backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let req = test::TestRequest::post()
        .uri("/student/1/delete")
        .set_form([("confirmed", "true")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let saved = backend.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["id"], json!("1"));
    assert_eq!(saved[0]["sys_Deactivated"], json!(true));
    let grid = grid.lock().unwrap();
    assert!(grid.find(&id("1")).is_none());
    assert_eq!(grid.rows().len(), 1);
}

#[actix_web::test]
async fn dismissed_delete_sends_nothing() {
    let (base, backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let req = test::TestRequest::post()
        .uri("/student/1/delete")
        .set_form([("confirmed", "false")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(backend.saved().is_empty());
    assert_eq!(grid.lock().unwrap().rows().len(), 2);
}

#[actix_web::test]
async fn delete_prompt_names_the_student() {
    let (base, _backend) = common::spawn_backend();
    let grid = grid();
    let app = init_app!(&base, grid);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let req = test::TestRequest::get().uri("/student/2/delete").to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("Are you sure you want to delete Alan?"));
    assert!(body.contains("action=\"/student/2/delete\""));
}
