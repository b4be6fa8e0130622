use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{map_constraint_error, AppError};
use crate::forms::slug::{slugify, unique_slug};
use crate::layout::{pack, unpack, validate, GridCell, Placement, WidthClass};
use crate::models::form::{FormCellRow, FormRow, FormSummary};
use crate::models::question::{OptionRow, Question, QuestionRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    pub title: String,
    pub description: Option<String>,
    /// Position of the form in admin listings.
    #[serde(default)]
    pub sort_order: i32,
}

/// Layout payload for a full-replacement save. Exactly one of the two
/// shapes must be present: pre-packed `cells` (validated as-is) or the
/// editor's ordered `placements` (packed first, then validated).
#[derive(Debug, Deserialize)]
pub struct UpdateFormRequest {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub cells: Option<Vec<GridCell>>,
    pub placements: Option<Vec<PlacementPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct PlacementPayload {
    pub question_id: Uuid,
    pub width: WidthClass,
}

#[derive(Debug, Serialize)]
pub struct FormItem {
    pub id: Uuid,
    pub question_id: Uuid,
    pub row: i32,
    pub col: i32,
    pub span: i32,
    pub ord: i32,
    pub question: Question,
}

#[derive(Debug, Serialize)]
pub struct FormDetail {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Cells in grid order with their question definitions joined.
    pub items: Vec<FormItem>,
    /// The editor's ordered card list, reconstructed from the grid.
    pub placements: Vec<Placement>,
}

#[derive(Debug, Serialize)]
pub struct SavedForm {
    pub id: Uuid,
    pub slug: String,
}

/// GET /api/forms
pub async fn handle_list_forms(
    State(state): State<AppState>,
) -> Result<Json<Vec<FormSummary>>, AppError> {
    let forms: Vec<FormSummary> = sqlx::query_as(
        "SELECT id, slug, title, sort_order, created_at FROM forms ORDER BY sort_order ASC, created_at ASC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(forms))
}

/// POST /api/forms
pub async fn handle_create_form(
    State(state): State<AppState>,
    Json(req): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<FormSummary>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let slug = unique_slug(&state.db, &slugify(title)).await?;
    let form: FormSummary = sqlx::query_as(
        r#"
        INSERT INTO forms (slug, title, description, sort_order)
        VALUES ($1, $2, $3, $4)
        RETURNING id, slug, title, sort_order, created_at
        "#,
    )
    .bind(&slug)
    .bind(title)
    .bind(&req.description)
    .bind(req.sort_order)
    .fetch_one(&state.db)
    .await
    .map_err(|e| map_constraint_error(e, "slug already exists", "invalid reference"))?;

    tracing::info!(form_id = %form.id, slug = %form.slug, "form created");
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /api/forms/:slug
pub async fn handle_get_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<FormDetail>, AppError> {
    let form = fetch_form(&state, &slug).await?;

    let cell_rows: Vec<FormCellRow> = sqlx::query_as(
        "SELECT * FROM form_cells WHERE form_id = $1 ORDER BY grid_row ASC, grid_col ASC, ord ASC",
    )
    .bind(form.id)
    .fetch_all(&state.db)
    .await?;

    let questions = fetch_questions_for_cells(&state, &cell_rows).await?;

    let cells: Vec<GridCell> = cell_rows.iter().map(FormCellRow::to_cell).collect();
    let placements = unpack(&cells)?;

    let items = cell_rows
        .iter()
        .filter_map(|row| {
            questions.get(&row.question_id).map(|q| FormItem {
                id: row.id,
                question_id: row.question_id,
                row: row.grid_row,
                col: row.col,
                span: row.span,
                ord: row.ord,
                question: q.clone(),
            })
        })
        .collect();

    Ok(Json(FormDetail {
        id: form.id,
        slug: form.slug,
        title: form.title,
        description: form.description,
        items,
        placements,
    }))
}

/// PUT /api/forms/:slug
///
/// Full replacement, last-writer-wins: the incoming layout is validated,
/// then the old cell set is deleted and the new one inserted in a single
/// transaction. Nothing is written if validation fails.
pub async fn handle_update_form(
    State(state): State<AppState>,
    Path(current_slug): Path<String>,
    Json(req): Json<UpdateFormRequest>,
) -> Result<Json<SavedForm>, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let cells = match (req.cells, req.placements) {
        (Some(cells), None) => cells,
        (None, Some(placements)) => {
            let ordered: Vec<Placement> = placements
                .into_iter()
                .map(|p| Placement::new(p.question_id, p.width))
                .collect();
            pack(&ordered)
        }
        _ => {
            return Err(AppError::Validation(
                "exactly one of cells or placements is required".to_string(),
            ))
        }
    };

    validate(&cells)?;

    let final_slug = match &req.slug {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(title),
    };

    let mut tx = state.db.begin().await?;

    let form: Option<FormRow> = sqlx::query_as(
        r#"
        UPDATE forms
        SET title = $1, slug = $2, description = $3, updated_at = now()
        WHERE slug = $4
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(&final_slug)
    .bind(&req.description)
    .bind(&current_slug)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| map_constraint_error(e, "slug already exists", "invalid reference"))?;

    let form =
        form.ok_or_else(|| AppError::NotFound(format!("Form '{current_slug}' not found")))?;

    sqlx::query("DELETE FROM form_cells WHERE form_id = $1")
        .bind(form.id)
        .execute(&mut *tx)
        .await?;

    for (ord, cell) in cells.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO form_cells (form_id, question_id, grid_row, grid_col, span, ord)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(form.id)
        .bind(cell.question_id)
        .bind(cell.row)
        .bind(cell.col)
        .bind(cell.span)
        .bind(ord as i32)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_constraint_error(
                e,
                "duplicate grid slot",
                "one or more question ids do not exist",
            )
        })?;
    }

    tx.commit().await?;

    tracing::info!(form_id = %form.id, slug = %form.slug, cells = cells.len(), "form layout replaced");
    Ok(Json(SavedForm {
        id: form.id,
        slug: form.slug,
    }))
}

/// DELETE /api/forms/:slug
pub async fn handle_delete_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM forms WHERE slug = $1")
        .bind(&slug)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Form '{slug}' not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn fetch_form(state: &AppState, slug: &str) -> Result<FormRow, AppError> {
    let form: Option<FormRow> = sqlx::query_as("SELECT * FROM forms WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&state.db)
        .await?;
    form.ok_or_else(|| AppError::NotFound(format!("Form '{slug}' not found")))
}

/// Loads the distinct questions referenced by a cell set, options included.
async fn fetch_questions_for_cells(
    state: &AppState,
    cells: &[FormCellRow],
) -> Result<HashMap<Uuid, Question>, AppError> {
    let mut ids: Vec<Uuid> = cells.iter().map(|c| c.question_id).collect();
    ids.sort();
    ids.dedup();

    let rows: Vec<QuestionRow> = sqlx::query_as("SELECT * FROM questions WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_all(&state.db)
        .await?;
    let options: Vec<OptionRow> =
        sqlx::query_as("SELECT * FROM options WHERE question_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(&state.db)
            .await?;

    let mut by_question: HashMap<Uuid, Vec<OptionRow>> = HashMap::new();
    for opt in options {
        by_question.entry(opt.question_id).or_default().push(opt);
    }

    Ok(rows
        .into_iter()
        .map(|question| {
            let options = by_question.remove(&question.id).unwrap_or_default();
            (question.id, Question { question, options })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;
    use serde_json::json;

    fn sample_question() -> Question {
        Question {
            question: QuestionRow {
                id: Uuid::new_v4(),
                label: "Your Name".to_string(),
                qtype: QuestionType::Text,
                required: true,
                help_text: None,
                file_multiple: None,
                sort_order: 0,
                created_at: chrono::Utc::now(),
            },
            options: vec![],
        }
    }

    #[test]
    fn test_create_form_request_accepts_sort_order() {
        let req: CreateFormRequest = serde_json::from_value(json!({
            "title": "Staff Survey",
            "sort_order": 3
        }))
        .unwrap();
        assert_eq!(req.sort_order, 3);
    }

    #[test]
    fn test_create_form_request_sort_order_defaults_to_zero() {
        let req: CreateFormRequest =
            serde_json::from_value(json!({ "title": "Staff Survey" })).unwrap();
        assert_eq!(req.sort_order, 0);
    }

    #[test]
    fn test_form_item_exposes_persisted_order() {
        let item = FormItem {
            id: Uuid::new_v4(),
            question_id: Uuid::new_v4(),
            row: 1,
            col: 1,
            span: 12,
            ord: 4,
            question: sample_question(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["ord"], 4);
        assert_eq!(value["span"], 12);
    }
}
