use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResponseRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
}
