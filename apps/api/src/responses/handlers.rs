use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{map_constraint_error, AppError};
use crate::forms::handlers::fetch_form;
use crate::models::response::ResponseRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub form_id: Uuid,
    pub user_email: Option<String>,
    /// question id → scalar or array answer.
    pub answers: HashMap<Uuid, Value>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponseResult {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ResponseDetail {
    #[serde(flatten)]
    pub response: ResponseRow,
    pub answers: Vec<AnswerView>,
}

/// An answer paired with the question label, for review screens.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AnswerView {
    pub question_id: Uuid,
    pub label: String,
    pub value: String,
}

/// POST /api/responses
pub async fn handle_submit_response(
    State(state): State<AppState>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<(StatusCode, Json<SubmitResponseResult>), AppError> {
    let mut tx = state.db.begin().await?;

    let response: ResponseRow = sqlx::query_as(
        "INSERT INTO responses (form_id, user_email) VALUES ($1, $2) RETURNING *",
    )
    .bind(req.form_id)
    .bind(&req.user_email)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_constraint_error(e, "duplicate response", "form does not exist"))?;

    for (question_id, value) in &req.answers {
        sqlx::query(
            "INSERT INTO answers (response_id, question_id, value) VALUES ($1, $2, $3)",
        )
        .bind(response.id)
        .bind(question_id)
        .bind(encode_answer(value))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(response_id = %response.id, form_id = %req.form_id, "response recorded");
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponseResult { id: response.id }),
    ))
}

/// GET /api/forms/:slug/responses
pub async fn handle_list_form_responses(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ResponseDetail>>, AppError> {
    let form = fetch_form(&state, &slug).await?;

    let responses: Vec<ResponseRow> =
        sqlx::query_as("SELECT * FROM responses WHERE form_id = $1 ORDER BY created_at DESC")
            .bind(form.id)
            .fetch_all(&state.db)
            .await?;

    let mut details = Vec::with_capacity(responses.len());
    for response in responses {
        let answers = fetch_answers(&state, response.id).await?;
        details.push(ResponseDetail { response, answers });
    }
    Ok(Json(details))
}

/// GET /api/responses/:id
pub async fn handle_get_response(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResponseDetail>, AppError> {
    let response: Option<ResponseRow> = sqlx::query_as("SELECT * FROM responses WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let response =
        response.ok_or_else(|| AppError::NotFound(format!("Response {id} not found")))?;

    let answers = fetch_answers(&state, response.id).await?;
    Ok(Json(ResponseDetail { response, answers }))
}

async fn fetch_answers(state: &AppState, response_id: Uuid) -> Result<Vec<AnswerView>, AppError> {
    let answers: Vec<AnswerView> = sqlx::query_as(
        r#"
        SELECT a.question_id, q.label, a.value
        FROM answers a
        JOIN questions q ON q.id = a.question_id
        WHERE a.response_id = $1
        ORDER BY q.sort_order ASC, q.created_at ASC
        "#,
    )
    .bind(response_id)
    .fetch_all(&state.db)
    .await?;
    Ok(answers)
}

/// Arrays (checkbox answers) are stored JSON-encoded; scalars verbatim.
fn encode_answer(value: &Value) -> String {
    match value {
        Value::Array(_) => value.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_scalar_answers_verbatim() {
        assert_eq!(encode_answer(&json!("hello")), "hello");
        assert_eq!(encode_answer(&json!(42)), "42");
        assert_eq!(encode_answer(&json!(true)), "true");
        assert_eq!(encode_answer(&Value::Null), "");
    }

    #[test]
    fn test_encode_array_answers_as_json() {
        assert_eq!(
            encode_answer(&json!(["speed", "design"])),
            r#"["speed","design"]"#
        );
        assert_eq!(encode_answer(&json!([])), "[]");
    }
}
