//! View-models for the presentation widgets.
//!
//! Widgets hold no form state of their own; they read validity and
//! required-ness of a bound field through its [`crate::forms::binder::FieldBinding`].

pub mod date_picker;
pub mod delete_confirmation;
pub mod image_uploader;
pub mod text_field;
