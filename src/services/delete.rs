//! Soft delete of the selected student.
//!
//! Deleting never removes anything on the backend: the selected record is
//! re-saved with its deactivation flag set. The row leaves the grid only
//! after the backend confirms the save.

use crate::client::{EntityClient, Transport};
use crate::domain::student::{STUDENT_ENTITY, StudentDto};
use crate::domain::types::StudentId;
use crate::notifications::{Notification, Notifier};
use crate::services::grid::{StudentGrid, Transaction};
use crate::services::{ServiceError, ServiceResult, failure_notification, transport_notification};
use crate::widgets::delete_confirmation::{Confirmation, DeleteConfirmationView};

pub const DELETE_SUCCEEDED: &str = "Record is deleted successfully!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteStage {
    Selected,
    Confirming,
    Submitting,
    Removed,
    Failed,
}

#[derive(Clone, Debug)]
pub struct DeleteFlow {
    id: StudentId,
    record: StudentDto,
    stage: DeleteStage,
}

impl DeleteFlow {
    /// Starts from the grid's current selection.
    pub fn start(grid: &StudentGrid) -> ServiceResult<Self> {
        let record = grid.selected().ok_or(ServiceError::NoSelection)?;
        let id = record.id.clone().ok_or(ServiceError::NoSelection)?;
        Ok(Self {
            id,
            record: record.clone(),
            stage: DeleteStage::Selected,
        })
    }

    pub fn record(&self) -> &StudentDto {
        &self.record
    }

    pub fn stage(&self) -> DeleteStage {
        self.stage
    }

    pub fn prompt(&mut self) -> DeleteConfirmationView {
        self.stage = DeleteStage::Confirming;
        DeleteConfirmationView::new(self.record.first_name_or_default())
    }

    /// Acts on the user's answer.
    ///
    /// Dismissal sends nothing. A confirmed delete yields a removal only when
    /// the backend reports success.
    pub async fn resolve<T, N>(
        &mut self,
        answer: Confirmation,
        client: &EntityClient<T>,
        notifier: &mut N,
    ) -> Option<Transaction>
    where
        T: Transport,
        N: Notifier + ?Sized,
    {
        if answer == Confirmation::Dismissed {
            log::debug!("Delete of student {} dismissed", self.id);
            self.stage = DeleteStage::Selected;
            return None;
        }

        self.stage = DeleteStage::Submitting;
        let payload = self.record.deactivated();
        match client.save::<StudentDto, _>(&payload, STUDENT_ENTITY).await {
            Ok(response) => match response.failure() {
                None => {
                    log::info!("Student {} deactivated", self.id);
                    notifier.notify(Notification::success(DELETE_SUCCEEDED));
                    self.stage = DeleteStage::Removed;
                    Some(Transaction::Remove(vec![self.id.clone()]))
                }
                Some(failure) => {
                    log::warn!("Failed to delete student {}: {}", self.id, failure.message);
                    notifier.notify(failure_notification(failure));
                    self.stage = DeleteStage::Failed;
                    None
                }
            },
            Err(err) => {
                log::error!("Failed to delete student {}: {err}", self.id);
                notifier.notify(transport_notification(&err));
                self.stage = DeleteStage::Failed;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::ClientError;
    use crate::client::test::{Request, TestTransport};
    use crate::models::endpoints::EndpointMap;
    use crate::notifications::Level;

    fn grid_with_selection() -> StudentGrid {
        let mut grid = StudentGrid::new();
        let ada = StudentDto {
            id: Some(StudentId::new("7").unwrap()),
            first_name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            ..StudentDto::default()
        };
        grid.set_rows(vec![ada]);
        grid.select(Some(&StudentId::new("7").unwrap()));
        grid
    }

    fn client(transport: &TestTransport) -> EntityClient<TestTransport> {
        EntityClient::new(
            transport.clone(),
            EndpointMap::from_rest_base("https://localhost:7162", ""),
        )
    }

    #[test]
    fn start_requires_a_selection() {
        let grid = StudentGrid::new();

        assert!(matches!(
            DeleteFlow::start(&grid),
            Err(ServiceError::NoSelection)
        ));
    }

    #[test]
    fn prompt_names_the_selected_student() {
        let mut flow = DeleteFlow::start(&grid_with_selection()).unwrap();

        let view = flow.prompt();

        assert_eq!(flow.stage(), DeleteStage::Confirming);
        assert!(view.message.contains("Ada"));
    }

    #[actix_web::test]
    async fn dismissed_prompt_sends_nothing() {
        let transport = TestTransport::new();
        let mut flow = DeleteFlow::start(&grid_with_selection()).unwrap();
        let mut toasts = Vec::<Notification>::new();

        let outcome = flow
            .resolve(Confirmation::Dismissed, &client(&transport), &mut toasts)
            .await;

        assert_eq!(outcome, None);
        assert!(transport.requests().is_empty());
        assert!(toasts.is_empty());
    }

    #[actix_web::test]
    async fn confirmed_delete_posts_deactivated_record() {
        let transport = TestTransport::new();
        transport.respond(json!({ "succeeded": true, "data": null }));
        let mut grid = grid_with_selection();
        let mut flow = DeleteFlow::start(&grid).unwrap();
        let mut toasts = Vec::<Notification>::new();

        let outcome = flow
            .resolve(Confirmation::Confirmed, &client(&transport), &mut toasts)
            .await;

        let Request::Post { url, body } = &transport.requests()[0] else {
            panic!("expected a save request");
        };
        assert_eq!(url, "https://localhost:7162/api/Student");
        assert_eq!(body["sys_Deactivated"], json!(true));
        assert_eq!(body["id"], json!("7"));
        assert_eq!(toasts, vec![Notification::success(DELETE_SUCCEEDED)]);

        grid.apply_transaction(outcome.unwrap());
        assert!(grid.rows().is_empty());
        assert_eq!(flow.stage(), DeleteStage::Removed);
    }

    #[actix_web::test]
    async fn failed_delete_keeps_the_row() {
        let transport = TestTransport::new();
        transport.respond(json!({
            "succeeded": false,
            "responseMessage": "ignored",
            "errors": [{ "code": "Locked", "description": "Student has open enrolments" }]
        }));
        let mut flow = DeleteFlow::start(&grid_with_selection()).unwrap();
        let mut toasts = Vec::<Notification>::new();

        let outcome = flow
            .resolve(Confirmation::Confirmed, &client(&transport), &mut toasts)
            .await;

        assert_eq!(outcome, None);
        assert_eq!(flow.stage(), DeleteStage::Failed);
        assert_eq!(
            toasts,
            vec![Notification::error(
                "Student has open enrolments",
                Some("Locked".to_string())
            )]
        );
    }

    #[actix_web::test]
    async fn transport_error_is_reported_by_name() {
        let transport = TestTransport::new();
        transport.fail(ClientError::transport("TimeoutError", "request timed out"));
        let mut flow = DeleteFlow::start(&grid_with_selection()).unwrap();
        let mut toasts = Vec::<Notification>::new();

        let outcome = flow
            .resolve(Confirmation::Confirmed, &client(&transport), &mut toasts)
            .await;

        assert_eq!(outcome, None);
        assert_eq!(toasts[0].level, Level::Error);
        assert_eq!(toasts[0].title.as_deref(), Some("TimeoutError"));
    }
}
