use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Insert a points notification inside an ongoing SQL transaction,
    /// so the recipient's transaction row and its notification commit
    /// together.
    pub async fn store_points_notification(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        points: i32,
        is_positive: bool,
        description: Option<&str>,
    ) -> Result<(), ServiceError> {
        let title = if is_positive {
            "Points added"
        } else {
            "Points deducted"
        };

        let content = match description {
            Some(desc) if !desc.is_empty() => {
                if is_positive {
                    format!("{} points were added ({})", points, desc)
                } else {
                    format!("{} points were deducted ({})", points, desc)
                }
            }
            _ => {
                if is_positive {
                    format!("{} points were added", points)
                } else {
                    format!("{} points were deducted", points)
                }
            }
        };

        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, title, content)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn notify_restriction_resolved(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        points: i32,
        category_name: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Restriction resolved notification: user {} for {} points",
            user_id,
            points
        );

        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, title, content)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind("Restriction lifted")
        .bind(format!(
            "The hold on {} points in category \"{}\" was lifted. You can now settle these points.",
            points, category_name
        ))
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn notify_user(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<(), ServiceError> {
        self.db_client
            .add_notification(user_id, title, content)
            .await?;
        Ok(())
    }
}
