use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::notificationmodel::Notification;

#[async_trait]
pub trait NotificationExt {
    async fn add_notification(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Notification, sqlx::Error>;

    async fn get_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error>;

    async fn get_notification_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn mark_notification_read(
        &self,
        notification_id: i64,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn add_notification(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, content, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, content, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_notification_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: i64,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
