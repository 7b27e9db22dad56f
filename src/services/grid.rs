//! In-memory student grid: row set, selection, quick filter.
//!
//! Rows are keyed by their backend identifier. The row set is only changed
//! through [`StudentGrid::set_rows`] after a load and
//! [`StudentGrid::apply_transaction`] after a completed save.

use serde::Serialize;

use crate::client::{EntityClient, Transport};
use crate::domain::student::{STUDENT_ENTITY, StudentDto};
use crate::domain::types::{DATE_FORMAT, StudentId};
use crate::notifications::{Notification, Notifier};
use crate::services::transport_notification;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub field: &'static str,
    pub header_name: &'static str,
    pub hide: bool,
}

impl ColumnDef {
    const fn shown(field: &'static str, header_name: &'static str) -> Self {
        Self {
            field,
            header_name,
            hide: false,
        }
    }
}

/// Columns of the student grid, identifier hidden.
pub fn student_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef {
            field: "id",
            header_name: "Id",
            hide: true,
        },
        ColumnDef::shown("firstName", "First Name"),
        ColumnDef::shown("lastName", "Last Name"),
        ColumnDef::shown("username", "Username"),
        ColumnDef::shown("phoneNumber", "Mobile"),
        ColumnDef::shown("email", "Email"),
        ColumnDef::shown("nicNumber", "NIC Number"),
        ColumnDef::shown("address", "Address"),
    ]
}

/// Text shown in a grid cell for `field`.
pub fn cell_text(row: &StudentDto, field: &str) -> String {
    let text = match field {
        "id" => row.id.as_ref().map(|id| id.as_str().to_string()),
        "firstName" => row.first_name.clone(),
        "lastName" => row.last_name.clone(),
        "username" => row.username.clone(),
        "phoneNumber" => row.phone_number.clone(),
        "email" => row.email.clone(),
        "nicNumber" => row.nic_number.clone(),
        "address" => row.address.clone(),
        "dateOfBirth" => row
            .date_of_birth
            .map(|date| date.format(DATE_FORMAT).to_string()),
        _ => None,
    };
    text.unwrap_or_default()
}

/// Row set change produced by a completed round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    Add(Vec<StudentDto>),
    Update(Vec<StudentDto>),
    Remove(Vec<StudentId>),
}

#[derive(Clone, Debug, Default)]
pub struct StudentGrid {
    rows: Vec<StudentDto>,
    selected: Option<StudentId>,
    quick_filter: String,
    loaded: bool,
}

impl StudentGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[StudentDto] {
        &self.rows
    }

    /// Whether a load has completed since start-up.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces the row set, keeping the selection only if its row survived.
    pub fn set_rows(&mut self, rows: Vec<StudentDto>) {
        self.rows = rows;
        self.loaded = true;
        if let Some(id) = self.selected.take() {
            self.select(Some(&id));
        }
    }

    pub fn find(&self, id: &StudentId) -> Option<&StudentDto> {
        self.rows.iter().find(|row| row.id.as_ref() == Some(id))
    }

    /// Selects the row with `id`; unknown ids and `None` clear the selection.
    pub fn select(&mut self, id: Option<&StudentId>) {
        self.selected = id.filter(|id| self.find(id).is_some()).cloned();
    }

    pub fn selected(&self) -> Option<&StudentDto> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    /// Edit and delete stay disabled until a row is selected.
    pub fn actions_disabled(&self) -> bool {
        self.selected().is_none()
    }

    pub fn set_quick_filter(&mut self, text: impl Into<String>) {
        self.quick_filter = text.into();
    }

    pub fn quick_filter(&self) -> &str {
        &self.quick_filter
    }

    /// Rows matching every word of the quick filter in some visible column.
    pub fn visible_rows(&self) -> Vec<&StudentDto> {
        let words: Vec<String> = self
            .quick_filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let columns = student_columns();

        self.rows
            .iter()
            .filter(|row| {
                let haystack: Vec<String> = columns
                    .iter()
                    .filter(|column| !column.hide)
                    .map(|column| cell_text(row, column.field).to_lowercase())
                    .collect();
                words
                    .iter()
                    .all(|word| haystack.iter().any(|cell| cell.contains(word.as_str())))
            })
            .collect()
    }

    pub fn apply_transaction(&mut self, transaction: Transaction) {
        match transaction {
            Transaction::Add(rows) | Transaction::Update(rows) => {
                for row in rows {
                    self.upsert(row);
                }
            }
            Transaction::Remove(ids) => {
                self.rows
                    .retain(|row| row.id.as_ref().is_none_or(|id| !ids.contains(id)));
                if self.selected.as_ref().is_some_and(|id| ids.contains(id)) {
                    self.selected = None;
                }
            }
        }
    }

    /// Replaces the row sharing `row`'s identifier, or appends it.
    fn upsert(&mut self, row: StudentDto) {
        let existing = row
            .id
            .as_ref()
            .and_then(|id| self.rows.iter().position(|r| r.id.as_ref() == Some(id)));
        match existing {
            Some(index) => self.rows[index] = row,
            None => self.rows.push(row),
        }
    }
}

/// Label of the per-row context-menu action.
pub fn context_menu_label(row: &StudentDto) -> String {
    format!(
        "Click for more information about {}",
        row.first_name_or_default()
    )
}

/// Loads every student; failures are reported and yield `None`.
pub async fn load_students<T, N>(
    client: &EntityClient<T>,
    notifier: &mut N,
) -> Option<Vec<StudentDto>>
where
    T: Transport,
    N: Notifier + ?Sized,
{
    match client.fetch_all::<StudentDto>(STUDENT_ENTITY).await {
        Ok(response) => match response.into_result() {
            Ok(rows) => Some(rows.unwrap_or_default()),
            Err(failure) => {
                log::error!("Failed to load students: {}", failure.message);
                notifier.notify(Notification::error(
                    failure.message,
                    Some("Error in retrieving data".to_string()),
                ));
                None
            }
        },
        Err(err) => {
            log::error!("Failed to load students: {err}");
            notifier.notify(transport_notification(&err));
            None
        }
    }
}
