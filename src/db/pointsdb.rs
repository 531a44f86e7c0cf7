use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::pointsmodel::{RestrictionView, SystemStats, TransactionLogEntry};

#[async_trait]
pub trait PointsExt {
    /// Signed sum of all transactions for a user. Derived, never stored.
    async fn get_balance(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_transaction_log(
        &self,
        cutoff: Option<DateTime<Utc>>,
        sign: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransactionLogEntry>, sqlx::Error>;

    async fn get_system_stats(&self) -> Result<SystemStats, sqlx::Error>;

    async fn get_unresolved_restrictions(&self) -> Result<Vec<RestrictionView>, sqlx::Error>;
}

#[async_trait]
impl PointsExt for DBClient {
    async fn get_balance(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(CASE WHEN is_positive THEN points ELSE -points END), 0)::BIGINT
            FROM points_transactions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_transaction_log(
        &self,
        cutoff: Option<DateTime<Utc>>,
        sign: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransactionLogEntry>, sqlx::Error> {
        sqlx::query_as::<_, TransactionLogEntry>(
            r#"
            SELECT
                t.id,
                t.user_id,
                u.full_name AS user_full_name,
                u.user_code,
                t.points,
                t.is_positive,
                t.description,
                c.name AS category_name,
                i.name AS item_name,
                cr.full_name AS creator_full_name,
                t.created_at
            FROM points_transactions t
            JOIN users u ON u.id = t.user_id
            LEFT JOIN point_categories c ON c.id = t.category_id
            LEFT JOIN point_category_items i ON i.id = t.item_id
            LEFT JOIN users cr ON cr.id = t.created_by
            WHERE ($1::TIMESTAMPTZ IS NULL OR t.created_at >= $1)
              AND ($2::BOOLEAN IS NULL OR t.is_positive = $2)
            ORDER BY t.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(cutoff)
        .bind(sign)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_system_stats(&self) -> Result<SystemStats, sqlx::Error> {
        sqlx::query_as::<_, SystemStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                COALESCE(SUM(CASE WHEN is_positive THEN points ELSE -points END), 0)::BIGINT AS total_points,
                COALESCE(SUM(points) FILTER (WHERE is_positive), 0)::BIGINT AS positive_points,
                COALESCE(SUM(points) FILTER (WHERE NOT is_positive), 0)::BIGINT AS negative_points,
                COUNT(DISTINCT user_id) AS active_users
            FROM points_transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_unresolved_restrictions(&self) -> Result<Vec<RestrictionView>, sqlx::Error> {
        sqlx::query_as::<_, RestrictionView>(
            r#"
            SELECT
                r.id,
                r.user_id,
                u.full_name AS user_full_name,
                u.user_code,
                r.category_id,
                c.name AS category_name,
                r.points,
                r.created_at
            FROM restricted_points r
            JOIN users u ON u.id = r.user_id
            JOIN point_categories c ON c.id = r.category_id
            WHERE r.is_resolved = FALSE
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
