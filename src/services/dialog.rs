//! Add/edit dialog for a single student.
//!
//! The dialog owns its form, the image selection and a cancellation token.
//! Saving is blocked until the form is valid. A successful save yields the
//! grid [`Transaction`] to apply and closes the dialog; a failure leaves it
//! open with the form untouched.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, EntityClient, Transport};
use crate::domain::student::{STUDENT_ENTITY, StudentDto};
use crate::domain::types::StudentId;
use crate::dto::response::ResponseDto;
use crate::forms::FormError;
use crate::forms::binder::{FieldBinding, FieldSpec, bind_fields};
use crate::forms::control::{FieldValue, FormGroup, FormModel};
use crate::forms::student::{student_fields, student_form};
use crate::notifications::{Notification, Notifier};
use crate::services::grid::{StudentGrid, Transaction};
use crate::services::{
    SAVE_FAILED, ServiceError, ServiceResult, failure_notification, transport_notification,
};
use crate::widgets::date_picker::DatePickerView;
use crate::widgets::image_uploader::{ImageFile, ImageUploader, ImageUploaderView};
use crate::widgets::text_field::{self, TextFieldView};

pub const SAVE_SUCCEEDED: &str = "Student is added successfully";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit(StudentDto),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Validating,
    Submitting,
    Succeeded,
    Failed,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form is invalid; nothing was sent.
    Blocked,
    Succeeded(Transaction),
    Failed,
    /// The dialog was closed before the reply arrived.
    Cancelled,
}

/// Add for a missing id, edit for an id present in the grid.
pub fn dialog_mode(grid: &StudentGrid, id: Option<&StudentId>) -> ServiceResult<DialogMode> {
    match id {
        None => Ok(DialogMode::Add),
        Some(id) => grid
            .find(id)
            .cloned()
            .map(DialogMode::Edit)
            .ok_or(ServiceError::NotFound),
    }
}

/// Render state of the whole dialog.
#[derive(Clone, Debug, Serialize)]
pub struct DialogView {
    pub title: &'static str,
    pub student_id: Option<String>,
    pub text_fields: Vec<TextFieldView>,
    pub date_of_birth: Option<DatePickerView>,
    pub image: ImageUploaderView,
    pub image_url: Option<String>,
    pub loading: bool,
    pub can_save: bool,
}

pub struct StudentDialog {
    mode: DialogMode,
    form: FormGroup,
    fields: Vec<FieldSpec>,
    uploader: ImageUploader,
    state: DialogState,
    loading: bool,
    cancel: CancellationToken,
}

impl StudentDialog {
    /// Opens a fresh dialog; edit mode pre-fills the form from the record.
    pub fn open(mode: DialogMode, date_of_birth_cutoff: NaiveDate) -> Self {
        let mut form = student_form(date_of_birth_cutoff);
        let fields = student_fields();
        for field in &fields {
            text_field::initialize(&field.config, &mut form);
        }
        if let DialogMode::Edit(record) = &mode {
            form.patch_value(record.form_values());
        }

        Self {
            mode,
            form,
            fields,
            uploader: ImageUploader::new(),
            state: DialogState::Open,
            loading: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Add => "Add",
            DialogMode::Edit(_) => "Edit",
        }
    }

    pub fn form(&self) -> &FormGroup {
        &self.form
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Field bindings keyed by field key.
    pub fn fields(&self) -> IndexMap<&'static str, FieldBinding<'_>> {
        bind_fields(&self.fields, &self.form)
    }

    /// Applies user edits and marks every control as touched.
    pub fn apply_input<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (&'static str, FieldValue)>,
    {
        self.form.patch_value(values);
        self.form.mark_all_as_touched();
    }

    pub fn select_image(&mut self, file: ImageFile) -> Result<(), FormError> {
        self.uploader.select(file).map(|_| ())
    }

    /// Resets every control to empty. An edit dialog keeps editing its record.
    pub fn clear(&mut self) {
        self.form.reset();
        self.uploader.remove();
    }

    /// Tears the dialog down; a save still in flight is abandoned.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.loading = false;
        self.state = DialogState::Closed;
    }

    /// Token cancelled when the dialog closes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Student sent to the backend: the form's raw value plus the image URL.
    ///
    /// Without a new selection the record's existing image is kept.
    pub fn payload(&self) -> StudentDto {
        let mut payload = StudentDto::from_form(&self.form);
        payload.image_url = match (self.uploader.selected(), &self.mode) {
            (Some(file), _) => Some(file.image_url()),
            (None, DialogMode::Edit(record)) => record.image_url.clone(),
            (None, DialogMode::Add) => None,
        };
        payload
    }

    pub fn view(&self) -> DialogView {
        let fields = self.fields();
        let date_of_birth = fields.get("dateOfBirthField").map(DatePickerView::new);
        let text_fields = fields
            .iter()
            .filter(|(key, _)| **key != "dateOfBirthField")
            .map(|(_, binding)| TextFieldView::new(binding))
            .collect();
        let student_id = match &self.mode {
            DialogMode::Edit(record) => record.id.as_ref().map(|id| id.as_str().to_string()),
            DialogMode::Add => None,
        };
        let payload = self.payload();

        DialogView {
            title: self.title(),
            student_id,
            text_fields,
            date_of_birth,
            image: self.uploader.view(),
            image_url: payload.image_url,
            loading: self.loading,
            can_save: self.form.is_valid() && !self.loading,
        }
    }

    /// Validates and saves the student.
    ///
    /// Every outcome other than [`SubmitOutcome::Blocked`] and
    /// [`SubmitOutcome::Cancelled`] raises exactly one notification.
    pub async fn submit<T, N>(
        &mut self,
        client: &EntityClient<T>,
        notifier: &mut N,
    ) -> SubmitOutcome
    where
        T: Transport,
        N: Notifier + ?Sized,
    {
        if self.cancel.is_cancelled() {
            return SubmitOutcome::Cancelled;
        }

        self.state = DialogState::Validating;
        self.form.validate();
        self.form.mark_all_as_touched();
        if !self.form.is_valid() {
            log::debug!(
                "Student form blocked, invalid controls: {:?}",
                self.form.invalid_controls()
            );
            self.state = DialogState::Open;
            return SubmitOutcome::Blocked;
        }

        self.state = DialogState::Submitting;
        self.loading = true;
        let cancel = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.send(client) => Some(result),
        };
        self.loading = false;

        let Some(result) = result else {
            log::info!("Student save abandoned: dialog closed");
            self.state = DialogState::Closed;
            return SubmitOutcome::Cancelled;
        };

        match result {
            Ok(response) => match response.into_result() {
                Ok(Some(record)) => {
                    let transaction = match self.mode {
                        DialogMode::Add => Transaction::Add(vec![record]),
                        DialogMode::Edit(_) => Transaction::Update(vec![record]),
                    };
                    notifier.notify(Notification::success(SAVE_SUCCEEDED));
                    self.cancel.cancel();
                    self.state = DialogState::Succeeded;
                    SubmitOutcome::Succeeded(transaction)
                }
                Ok(None) => {
                    log::warn!("Student save succeeded without returning the record");
                    notifier.notify(Notification::error(
                        "The server did not return the saved student",
                        Some(SAVE_FAILED.to_string()),
                    ));
                    self.state = DialogState::Failed;
                    SubmitOutcome::Failed
                }
                Err(failure) => {
                    log::warn!("Student save rejected: {}", failure.message);
                    notifier.notify(failure_notification(failure));
                    self.state = DialogState::Failed;
                    SubmitOutcome::Failed
                }
            },
            Err(err) => {
                log::error!("Student save failed: {err}");
                notifier.notify(transport_notification(&err));
                self.state = DialogState::Failed;
                SubmitOutcome::Failed
            }
        }
    }

    /// Uploads the selected image, then posts the payload.
    ///
    /// Upload failures are logged only; the save still goes out.
    async fn send<T: Transport>(
        &self,
        client: &EntityClient<T>,
    ) -> Result<ResponseDto<StudentDto>, ClientError> {
        if let Some(file) = self.uploader.selected() {
            match client.upload_image(file).await {
                Ok(reply) => log::info!("Uploaded image {}: {reply}", file.asset_name()),
                Err(err) => log::error!("Failed to upload image {}: {err}", file.asset_name()),
            }
        }
        client
            .save::<StudentDto, _>(&self.payload(), STUDENT_ENTITY)
            .await
    }
}
