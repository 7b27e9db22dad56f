//! DTO modules that bridge the backend API with services and templates.

pub mod response;
#[cfg(feature = "server")]
pub mod views;
