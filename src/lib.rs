#[cfg(feature = "server")]
pub mod client;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod notifications;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
mod server;
#[cfg(feature = "server")]
pub mod services;
pub mod widgets;

#[cfg(feature = "server")]
pub use server::run;
