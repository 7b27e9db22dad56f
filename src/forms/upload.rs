use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::Utc;

use crate::forms::FormError;
use crate::forms::student::StudentFormInput;
use crate::widgets::image_uploader::ImageFile;

/// Multipart body posted by the student dialog.
#[derive(MultipartForm)]
pub struct StudentMultipartForm {
    pub id: Option<Text<String>>,
    #[multipart(rename = "firstName")]
    pub first_name: Option<Text<String>>,
    #[multipart(rename = "lastName")]
    pub last_name: Option<Text<String>>,
    pub username: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub address: Option<Text<String>>,
    #[multipart(rename = "dateOfBirth")]
    pub date_of_birth: Option<Text<String>>,
    #[multipart(rename = "phoneNumber")]
    pub phone_number: Option<Text<String>>,
    #[multipart(rename = "nicNumber")]
    pub nic_number: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
    /// Browser-reported `lastModified` of the image, in milliseconds.
    ///
    /// Posted blank when no file is chosen.
    #[multipart(rename = "imageLastModified")]
    pub image_last_modified: Option<Text<String>>,
    /// Name of the pressed submit button.
    pub action: Option<Text<String>>,
}

pub const CLEAR_ACTION: &str = "clear";

fn text(field: Option<Text<String>>) -> Option<String> {
    field.map(Text::into_inner)
}

/// Parses `lastModified`, falling back to the current time.
fn last_modified(field: Option<Text<String>>) -> i64 {
    field
        .map(Text::into_inner)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_else(|| Utc::now().timestamp_millis())
}

impl StudentMultipartForm {
    /// Whether the Clear button submitted the form.
    pub fn requests_clear(&self) -> bool {
        self.action.as_ref().is_some_and(|action| action.0 == CLEAR_ACTION)
    }

    /// Splits the body into the text input and the attached image, if any.
    ///
    /// Reads the temporary file synchronously; call it off the async executor.
    pub fn into_parts(self) -> Result<(StudentFormInput, Option<ImageFile>), FormError> {
        let input = StudentFormInput {
            id: text(self.id),
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            username: text(self.username),
            email: text(self.email),
            address: text(self.address),
            date_of_birth: text(self.date_of_birth),
            phone_number: text(self.phone_number),
            nic_number: text(self.nic_number),
        };

        let last_modified = last_modified(self.image_last_modified);

        let image = match self.image {
            Some(upload) if upload.size > 0 => Some(read_image(upload, last_modified)?),
            _ => None,
        };

        Ok((input, image))
    }
}

fn read_image(upload: TempFile, last_modified: i64) -> Result<ImageFile, FormError> {
    let bytes =
        std::fs::read(upload.file.path()).map_err(|err| FormError::Upload(err.to_string()))?;

    Ok(ImageFile {
        name: upload.file_name.unwrap_or_default(),
        content_type: upload
            .content_type
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default(),
        last_modified,
        bytes,
    })
}
