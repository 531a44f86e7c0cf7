use std::sync::Arc;

use crate::{
    db::{db::DBClient, pointsdb::PointsExt},
    models::pointsmodel::{RestrictedPoint, RestrictionView},
    service::{error::ServiceError, notification_service::NotificationService},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The hold was active and is now resolved; the student was notified.
    Resolved,
    /// The hold had already been resolved; nothing changed and no second
    /// notification was sent.
    AlreadyResolved,
}

#[derive(Debug, Clone)]
pub struct RestrictionService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl RestrictionService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn list_unresolved(&self) -> Result<Vec<RestrictionView>, ServiceError> {
        let restrictions = self.db_client.get_unresolved_restrictions().await?;
        Ok(restrictions)
    }

    /// Resolve a hold exactly once. The guarded UPDATE makes repeat
    /// calls a no-op, so the student never receives duplicate lifted
    /// notifications.
    pub async fn resolve_restriction(
        &self,
        restriction_id: i32,
    ) -> Result<ResolveOutcome, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let resolved = sqlx::query_as::<_, RestrictedPoint>(
            r#"
            UPDATE restricted_points
            SET is_resolved = TRUE
            WHERE id = $1 AND is_resolved = FALSE
            RETURNING id, user_id, category_id, points, is_resolved, created_by, created_at
            "#,
        )
        .bind(restriction_id)
        .fetch_optional(&mut *tx)
        .await?;

        let restriction = match resolved {
            Some(restriction) => restriction,
            None => {
                tx.rollback().await?;

                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS (SELECT 1 FROM restricted_points WHERE id = $1)",
                )
                .bind(restriction_id)
                .fetch_one(&self.db_client.pool)
                .await?;

                if exists {
                    return Ok(ResolveOutcome::AlreadyResolved);
                }
                return Err(ServiceError::RestrictionNotFound(restriction_id));
            }
        };

        let category_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM point_categories WHERE id = $1",
        )
        .bind(restriction.category_id)
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or_else(|| "unknown".to_string());

        self.notification_service
            .notify_restriction_resolved(
                &mut tx,
                restriction.user_id,
                restriction.points,
                &category_name,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Restriction {} resolved for user {}",
            restriction_id,
            restriction.user_id
        );

        Ok(ResolveOutcome::Resolved)
    }
}
