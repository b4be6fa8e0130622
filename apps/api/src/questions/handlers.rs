use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::question::{OptionRow, Question, QuestionRow, QuestionType};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub label: String,
    #[serde(rename = "type")]
    pub qtype: QuestionType,
    #[serde(default)]
    pub required: bool,
    pub help_text: Option<String>,
    pub file_multiple: Option<bool>,
    #[serde(default)]
    pub sort_order: i32,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub label: String,
    #[serde(rename = "type")]
    pub qtype: QuestionType,
    #[serde(default)]
    pub required: bool,
    pub help_text: Option<String>,
    pub options: Option<Vec<String>>,
}

/// GET /api/questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, AppError> {
    let rows: Vec<QuestionRow> =
        sqlx::query_as("SELECT * FROM questions ORDER BY sort_order ASC, created_at ASC")
            .fetch_all(&state.db)
            .await?;

    let ids: Vec<Uuid> = rows.iter().map(|q| q.id).collect();
    let options: Vec<OptionRow> =
        sqlx::query_as("SELECT * FROM options WHERE question_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(&state.db)
            .await?;

    let mut by_question: HashMap<Uuid, Vec<OptionRow>> = HashMap::new();
    for opt in options {
        by_question.entry(opt.question_id).or_default().push(opt);
    }

    Ok(Json(
        rows.into_iter()
            .map(|question| {
                let options = by_question.remove(&question.id).unwrap_or_default();
                Question { question, options }
            })
            .collect(),
    ))
}

/// POST /api/questions
pub async fn handle_create_question(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    if req.label.trim().is_empty() {
        return Err(AppError::Validation("label is required".to_string()));
    }

    // file_multiple is only meaningful for file questions.
    let file_multiple = if req.qtype == QuestionType::File {
        req.file_multiple
    } else {
        None
    };

    let mut tx = state.db.begin().await?;

    let question: QuestionRow = sqlx::query_as(
        r#"
        INSERT INTO questions (label, qtype, required, help_text, file_multiple, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(req.label.trim())
    .bind(req.qtype)
    .bind(req.required)
    .bind(&req.help_text)
    .bind(file_multiple)
    .bind(req.sort_order)
    .fetch_one(&mut *tx)
    .await?;

    let options = match &req.options {
        Some(values) if !values.is_empty() => {
            insert_options(&mut tx, question.id, values).await?
        }
        _ => vec![],
    };

    tx.commit().await?;

    tracing::info!(question_id = %question.id, "question created");
    Ok((StatusCode::CREATED, Json(Question { question, options })))
}

/// PATCH /api/questions/:id
pub async fn handle_update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    if req.label.trim().is_empty() {
        return Err(AppError::Validation("label is required".to_string()));
    }
    if req.qtype.is_choice() && req.options.is_none() {
        return Err(AppError::Validation(
            "options[] required for this type".to_string(),
        ));
    }

    let mut tx = state.db.begin().await?;

    let question: Option<QuestionRow> = sqlx::query_as(
        r#"
        UPDATE questions
        SET label = $1, qtype = $2, required = $3, help_text = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(req.label.trim())
    .bind(req.qtype)
    .bind(req.required)
    .bind(&req.help_text)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let question = question.ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))?;

    // Replace the option set if provided.
    let options = if let Some(values) = &req.options {
        sqlx::query("DELETE FROM options WHERE question_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_options(&mut tx, id, values).await?
    } else {
        sqlx::query_as("SELECT * FROM options WHERE question_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?
    };

    tx.commit().await?;

    Ok(Json(Question { question, options }))
}

/// DELETE /api/questions/:id
///
/// Blocked while the question is still placed on any form (RESTRICT FK).
pub async fn handle_delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return AppError::Conflict(
                        "question is placed on a form and cannot be deleted".to_string(),
                    );
                }
            }
            AppError::Database(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Question {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn insert_options(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    question_id: Uuid,
    values: &[String],
) -> Result<Vec<OptionRow>, sqlx::Error> {
    let mut options = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        let opt: OptionRow = sqlx::query_as(
            "INSERT INTO options (question_id, label, value) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(question_id)
        .bind(trimmed)
        .bind(trimmed)
        .fetch_one(&mut **tx)
        .await?;
        options.push(opt);
    }
    Ok(options)
}
