//! HTTP server wiring.

use std::sync::Mutex;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::client::EntityClient;
use crate::client::http::ReqwestTransport;
use crate::models::config::ServerConfig;
use crate::routes::main::{refresh, show_index};
use crate::routes::student::{
    confirm_delete, delete_student, edit_student, new_student, save_student, student_info,
};
use crate::services::grid::StudentGrid;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let client = web::Data::new(EntityClient::new(
        ReqwestTransport::new(),
        server_config.endpoint_map(),
    ));
    // Rows are shared by every worker and only patched after completed round trips.
    let grid = web::Data::new(Mutex::new(StudentGrid::new()));

    if server_config.secret.len() < 64 {
        return Err(std::io::Error::other(
            "secret must be at least 64 bytes long",
        ));
    }
    let secret_key = Key::from(server_config.secret.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving student admin on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.rest_base
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(refresh)
            .service(new_student)
            .service(edit_student)
            .service(save_student)
            .service(student_info)
            .service(confirm_delete)
            .service(delete_student)
            .app_data(web::Data::new(tera.clone()))
            .app_data(client.clone())
            .app_data(grid.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
