//! Stub student backend bound on an ephemeral local port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::header, web};
use serde_json::{Value, json};

pub const TAKEN_EMAIL: &str = "taken@example.com";

#[derive(Clone, Default)]
pub struct Backend {
    pub saved: Arc<Mutex<Vec<Value>>>,
    pub uploads: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    pub fn saved(&self) -> Vec<Value> {
        self.saved.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

async fn list_students() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "succeeded": true,
        "responseMessage": "",
        "errors": [],
        "data": [
            {
                "id": "1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "dateOfBirth": "2001-05-04T00:00:00",
                "nicNumber": "991234567V",
                "phoneNumber": "0771234567"
            },
            {
                "id": "2",
                "firstName": "Alan",
                "lastName": "Turing",
                "email": "alan@example.com",
                "dateOfBirth": "2002-06-23",
                "nicNumber": "021234567V"
            }
        ]
    }))
}

async fn save_student(backend: web::Data<Backend>, body: web::Json<Value>) -> HttpResponse {
    let mut student = body.into_inner();
    backend.saved.lock().unwrap().push(student.clone());

    if student["email"] == json!(TAKEN_EMAIL) {
        return HttpResponse::Ok().json(json!({
            "succeeded": false,
            "responseMessage": "Validation failed",
            "errors": [{ "code": "DuplicateEmail", "description": "Email already in use" }]
        }));
    }
    if student.get("id").is_none() {
        student["id"] = json!("99");
    }
    HttpResponse::Ok().json(json!({ "succeeded": true, "data": student }))
}

async fn upload_image(
    backend: web::Data<Backend>,
    req: HttpRequest,
    name: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));
    if !multipart || body.is_empty() {
        return HttpResponse::BadRequest().finish();
    }
    backend.uploads.lock().unwrap().push(name.into_inner());
    HttpResponse::Ok().body("{}")
}

/// Starts the stub and returns its base URL.
pub fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let data = web::Data::new(backend.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/Student", web::get().to(list_students))
            .route("/api/Student", web::post().to(save_student))
            .route(
                "/api/Broken",
                web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
            )
            .route("/assets/img/{name}", web::post().to(upload_image))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let address = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{address}"), backend)
}
