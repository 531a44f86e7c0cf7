use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Notification {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
