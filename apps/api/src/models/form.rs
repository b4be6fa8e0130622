use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::layout::GridCell;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One persisted layout cell. `ord` preserves the packer's emission order
/// for stable tiebreaks; the grid position itself lives in (row, col, span).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormCellRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub question_id: Uuid,
    // `row` is reserved in Postgres; columns are grid_row/grid_col.
    // The Rust field can't be named `row` either: sqlx's FromRow derive
    // shadows its row parameter with a field binding of that name.
    #[serde(rename = "row")]
    pub grid_row: i32,
    #[sqlx(rename = "grid_col")]
    pub col: i32,
    pub span: i32,
    pub ord: i32,
}

impl FormCellRow {
    pub fn to_cell(&self) -> GridCell {
        GridCell {
            question_id: self.question_id,
            row: self.grid_row,
            col: self.col,
            span: self.span,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}
