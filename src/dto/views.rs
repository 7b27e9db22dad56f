use serde::Serialize;

use crate::domain::student::StudentDto;
use crate::services::grid::{ColumnDef, StudentGrid, cell_text, context_menu_label, student_columns};

/// One rendered grid row.
#[derive(Debug, Serialize)]
pub struct GridRowView {
    pub id: Option<String>,
    /// Cell texts of the visible columns, in column order.
    pub cells: Vec<String>,
    pub selected: bool,
    pub context_menu: String,
}

/// Data required to render the main index template.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<GridRowView>,
    pub quick_filter: String,
    pub selected_id: Option<String>,
    /// Edit/delete buttons are disabled while nothing is selected.
    pub actions_disabled: bool,
}

impl IndexPageData {
    pub fn from_grid(grid: &StudentGrid) -> Self {
        let columns: Vec<ColumnDef> = student_columns()
            .into_iter()
            .filter(|column| !column.hide)
            .collect();
        let selected_id = grid
            .selected()
            .and_then(|row| row.id.as_ref())
            .map(|id| id.as_str().to_string());

        let rows = grid
            .visible_rows()
            .into_iter()
            .map(|row| {
                let id = row.id.as_ref().map(|id| id.as_str().to_string());
                GridRowView {
                    selected: id.is_some() && id == selected_id,
                    cells: columns
                        .iter()
                        .map(|column| cell_text(row, column.field))
                        .collect(),
                    context_menu: context_menu_label(row),
                    id,
                }
            })
            .collect();

        Self {
            columns,
            rows,
            quick_filter: grid.quick_filter().to_string(),
            selected_id,
            actions_disabled: grid.actions_disabled(),
        }
    }
}

/// Read-only details of one student.
#[derive(Debug, Serialize)]
pub struct InfoPageData {
    pub title: String,
    pub image_url: Option<String>,
    pub fields: Vec<(&'static str, String)>,
}

impl From<&StudentDto> for InfoPageData {
    fn from(student: &StudentDto) -> Self {
        let mut fields: Vec<(&'static str, String)> = student_columns()
            .into_iter()
            .filter(|column| !column.hide)
            .map(|column| (column.header_name, cell_text(student, column.field)))
            .collect();
        fields.push(("Date of Birth", cell_text(student, "dateOfBirth")));

        Self {
            title: context_menu_label(student),
            image_url: student.image_url.clone(),
            fields,
        }
    }
}
