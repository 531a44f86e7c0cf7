use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::pointsmodel::{PointCategory, PointCategoryItem};

#[async_trait]
pub trait CategoryExt {
    async fn get_category(&self, category_id: i32) -> Result<Option<PointCategory>, sqlx::Error>;

    /// `is_positive = None` lists every category.
    async fn get_categories(
        &self,
        is_positive: Option<bool>,
    ) -> Result<Vec<PointCategory>, sqlx::Error>;

    async fn create_category(
        &self,
        name: String,
        description: Option<String>,
        default_points: i32,
        is_positive: bool,
        is_mandatory: bool,
        is_restricted: bool,
        created_by: Uuid,
    ) -> Result<PointCategory, sqlx::Error>;

    async fn update_category(
        &self,
        category_id: i32,
        name: String,
        description: Option<String>,
        default_points: i32,
        is_positive: bool,
        is_mandatory: bool,
        is_restricted: bool,
    ) -> Result<Option<PointCategory>, sqlx::Error>;

    async fn delete_category(&self, category_id: i32) -> Result<u64, sqlx::Error>;

    /// Number of transactions referencing a category. Deletion is
    /// refused while this is non-zero.
    async fn category_transaction_count(&self, category_id: i32) -> Result<i64, sqlx::Error>;

    async fn get_item(&self, item_id: i32) -> Result<Option<PointCategoryItem>, sqlx::Error>;

    async fn get_items(
        &self,
        category_id: Option<i32>,
        active_only: bool,
    ) -> Result<Vec<PointCategoryItem>, sqlx::Error>;

    async fn create_item(
        &self,
        category_id: i32,
        name: String,
        description: Option<String>,
        points: i32,
        is_active: bool,
    ) -> Result<PointCategoryItem, sqlx::Error>;

    async fn update_item(
        &self,
        item_id: i32,
        name: String,
        description: Option<String>,
        points: i32,
        is_active: bool,
    ) -> Result<Option<PointCategoryItem>, sqlx::Error>;

    async fn delete_item(&self, item_id: i32) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl CategoryExt for DBClient {
    async fn get_category(&self, category_id: i32) -> Result<Option<PointCategory>, sqlx::Error> {
        sqlx::query_as::<_, PointCategory>(
            r#"
            SELECT id, name, description, default_points, is_positive,
                   is_mandatory, is_restricted, created_by, created_at
            FROM point_categories
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_categories(
        &self,
        is_positive: Option<bool>,
    ) -> Result<Vec<PointCategory>, sqlx::Error> {
        sqlx::query_as::<_, PointCategory>(
            r#"
            SELECT id, name, description, default_points, is_positive,
                   is_mandatory, is_restricted, created_by, created_at
            FROM point_categories
            WHERE ($1::BOOLEAN IS NULL OR is_positive = $1)
            ORDER BY name
            "#,
        )
        .bind(is_positive)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_category(
        &self,
        name: String,
        description: Option<String>,
        default_points: i32,
        is_positive: bool,
        is_mandatory: bool,
        is_restricted: bool,
        created_by: Uuid,
    ) -> Result<PointCategory, sqlx::Error> {
        sqlx::query_as::<_, PointCategory>(
            r#"
            INSERT INTO point_categories
                (name, description, default_points, is_positive, is_mandatory, is_restricted, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, default_points, is_positive,
                      is_mandatory, is_restricted, created_by, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(default_points)
        .bind(is_positive)
        .bind(is_mandatory)
        .bind(is_restricted)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_category(
        &self,
        category_id: i32,
        name: String,
        description: Option<String>,
        default_points: i32,
        is_positive: bool,
        is_mandatory: bool,
        is_restricted: bool,
    ) -> Result<Option<PointCategory>, sqlx::Error> {
        sqlx::query_as::<_, PointCategory>(
            r#"
            UPDATE point_categories
            SET name = $2,
                description = $3,
                default_points = $4,
                is_positive = $5,
                is_mandatory = $6,
                is_restricted = $7
            WHERE id = $1
            RETURNING id, name, description, default_points, is_positive,
                      is_mandatory, is_restricted, created_by, created_at
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(default_points)
        .bind(is_positive)
        .bind(is_mandatory)
        .bind(is_restricted)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_category(&self, category_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM point_categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn category_transaction_count(&self, category_id: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM points_transactions WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_item(&self, item_id: i32) -> Result<Option<PointCategoryItem>, sqlx::Error> {
        sqlx::query_as::<_, PointCategoryItem>(
            r#"
            SELECT id, category_id, name, description, points, is_active, created_at
            FROM point_category_items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_items(
        &self,
        category_id: Option<i32>,
        active_only: bool,
    ) -> Result<Vec<PointCategoryItem>, sqlx::Error> {
        sqlx::query_as::<_, PointCategoryItem>(
            r#"
            SELECT id, category_id, name, description, points, is_active, created_at
            FROM point_category_items
            WHERE ($1::INTEGER IS NULL OR category_id = $1)
              AND ($2 = FALSE OR is_active = TRUE)
            ORDER BY name
            "#,
        )
        .bind(category_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_item(
        &self,
        category_id: i32,
        name: String,
        description: Option<String>,
        points: i32,
        is_active: bool,
    ) -> Result<PointCategoryItem, sqlx::Error> {
        sqlx::query_as::<_, PointCategoryItem>(
            r#"
            INSERT INTO point_category_items (category_id, name, description, points, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, category_id, name, description, points, is_active, created_at
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(points)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_item(
        &self,
        item_id: i32,
        name: String,
        description: Option<String>,
        points: i32,
        is_active: bool,
    ) -> Result<Option<PointCategoryItem>, sqlx::Error> {
        sqlx::query_as::<_, PointCategoryItem>(
            r#"
            UPDATE point_category_items
            SET name = $2,
                description = $3,
                points = $4,
                is_active = $5
            WHERE id = $1
            RETURNING id, category_id, name, description, points, is_active, created_at
            "#,
        )
        .bind(item_id)
        .bind(name)
        .bind(description)
        .bind(points)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_item(&self, item_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM point_category_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
