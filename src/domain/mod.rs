//! Domain entities shared by the forms, services and routes.

pub mod student;
pub mod types;
