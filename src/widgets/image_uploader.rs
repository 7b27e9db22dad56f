//! Image attachment widget state.
//!
//! The uploader hands the selected file to its owner explicitly; there is no
//! shared broadcast channel between uploader and dialog.

use serde::Serialize;

use crate::forms::FormError;

/// MIME types the uploader accepts.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/svg", "image/jpg"];

/// Image picked by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    /// Last-modified time in milliseconds since the Unix epoch.
    pub last_modified: i64,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Asset file name: last-modified timestamp followed by the original name.
    pub fn asset_name(&self) -> String {
        format!("{}{}", self.last_modified, self.name)
    }

    /// Value stored in the student's `imageUrl`.
    pub fn image_url(&self) -> String {
        format!("/assets/img/{}", self.name)
    }
}

/// Current selection of the uploader.
#[derive(Clone, Debug, Default)]
pub struct ImageUploader {
    selected: Option<ImageFile>,
}

impl ImageUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection; files with other MIME types are rejected.
    pub fn select(&mut self, file: ImageFile) -> Result<&ImageFile, FormError> {
        if !ACCEPTED_IMAGE_TYPES.contains(&file.content_type.as_str()) {
            return Err(FormError::UnsupportedImageType(file.content_type));
        }
        Ok(self.selected.insert(file))
    }

    pub fn remove(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&ImageFile> {
        self.selected.as_ref()
    }

    pub fn view(&self) -> ImageUploaderView {
        ImageUploaderView {
            accept: ACCEPTED_IMAGE_TYPES.join(","),
            selected_name: self.selected.as_ref().map(|file| file.name.clone()),
        }
    }
}

/// Render state of the uploader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageUploaderView {
    pub accept: String,
    pub selected_name: Option<String>,
}
