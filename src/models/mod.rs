//! Configuration and endpoint models shared across the application.

#[cfg(feature = "server")]
pub mod config;
pub mod endpoints;
