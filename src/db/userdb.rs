use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::{
    pointsmodel::LeaderboardEntry,
    usermodel::{User, UserRole},
};

pub const USER_COLUMNS: &str = r#"
    id, full_name, email, password, user_code, role,
    avatar_url, phone, created_at, updated_at
"#;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        user_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        full_name: T,
        email: T,
        password: T,
        user_code: T,
        role: UserRole,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error>;

    /// Resolve a batch of user codes to users. Codes with no matching
    /// row are simply absent from the result.
    async fn get_users_by_codes(&self, user_codes: &[String]) -> Result<Vec<User>, sqlx::Error>;

    async fn user_code_exists(&self, user_code: &str) -> Result<bool, sqlx::Error>;

    async fn update_user_name<T: Into<String> + Send>(
        &self,
        user_id: Uuid,
        full_name: T,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_avatar(
        &self,
        user_id: Uuid,
        avatar_url: String,
    ) -> Result<User, sqlx::Error>;

    /// Students ranked by signed transaction balance.
    async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        user_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(user_code) = user_code {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE user_code = $1"
            ))
            .bind(user_code)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error> {
        // i64 so an extreme page number cannot overflow the offset.
        let offset = (page as i64 - 1) * limit as i64;

        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        full_name: T,
        email: T,
        password: T,
        user_code: T,
        role: UserRole,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (full_name, email, password, user_code, role, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(full_name.into())
        .bind(email.into())
        .bind(password.into())
        .bind(user_code.into())
        .bind(role)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_users_by_codes(&self, user_codes: &[String]) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_code = ANY($1)"
        ))
        .bind(user_codes)
        .fetch_all(&self.pool)
        .await
    }

    async fn user_code_exists(&self, user_code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_code = $1)")
            .bind(user_code)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_user_name<T: Into<String> + Send>(
        &self,
        user_id: Uuid,
        full_name: T,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET full_name = $2,
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(full_name.into())
        .bind(phone)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET password = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_avatar(
        &self,
        user_id: Uuid,
        avatar_url: String,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET avatar_url = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT
                u.id AS user_id,
                u.full_name,
                u.user_code,
                u.avatar_url,
                COALESCE(SUM(CASE WHEN t.is_positive THEN t.points ELSE -t.points END), 0)::BIGINT AS balance
            FROM users u
            LEFT JOIN points_transactions t ON t.user_id = u.id
            WHERE u.role = 'student'::user_role
            GROUP BY u.id, u.full_name, u.user_code, u.avatar_url
            ORDER BY balance DESC, u.full_name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
