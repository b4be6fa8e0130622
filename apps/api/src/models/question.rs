use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Control type of a bank question. Stored as the `question_type` Postgres
/// enum; serialized lowercase on the wire (`"text"`, `"radio"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "question_type", rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Select,
    Number,
    Date,
    File,
}

impl QuestionType {
    /// Choice-based types carry an option set.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionType::Radio | QuestionType::Checkbox | QuestionType::Select
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub qtype: QuestionType,
    pub required: bool,
    pub help_text: Option<String>,
    pub file_multiple: Option<bool>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OptionRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub label: String,
    pub value: String,
}

/// A bank question with its option set joined in, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    #[serde(flatten)]
    pub question: QuestionRow,
    pub options: Vec<OptionRow>,
}
