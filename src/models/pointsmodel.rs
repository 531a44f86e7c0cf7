use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of point rules with a default value and sign.
///
/// The mandatory/restricted flags only carry meaning for negative
/// categories; positive categories always store them as false.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PointCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub default_points: i32,
    pub is_positive: bool,
    pub is_mandatory: bool,
    pub is_restricted: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A specific named action under a category with its own point value.
/// The point sign is implied by the owning category's `is_positive`.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PointCategoryItem {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Immutable record of points awarded to or deducted from one user.
/// There is no update or delete path once a row is written.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PointsTransaction {
    pub id: i64,
    pub user_id: Uuid,
    /// Positive magnitude; the sign lives in `is_positive`.
    pub points: i32,
    pub is_positive: bool,
    pub category_id: Option<i32>,
    pub item_id: Option<i32>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// An administrative hold on a negative-point transaction pending
/// resolution. Transitions Active -> Resolved exactly once.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct RestrictedPoint {
    pub id: i32,
    pub user_id: Uuid,
    pub category_id: i32,
    pub points: i32,
    pub is_resolved: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Transaction log row joined with the names the admin view displays.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TransactionLogEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub user_full_name: String,
    pub user_code: String,
    pub points: i32,
    pub is_positive: bool,
    pub description: Option<String>,
    pub category_name: Option<String>,
    pub item_name: Option<String>,
    pub creator_full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Unresolved restriction joined with user and category names.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RestrictionView {
    pub id: i32,
    pub user_id: Uuid,
    pub user_full_name: String,
    pub user_code: String,
    pub category_id: i32,
    pub category_name: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct SystemStats {
    pub total_users: i64,
    pub total_points: i64,
    pub positive_points: i64,
    pub negative_points: i64,
    pub active_users: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub full_name: String,
    pub user_code: String,
    pub avatar_url: Option<String>,
    pub balance: i64,
}
