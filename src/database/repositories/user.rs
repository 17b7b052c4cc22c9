use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Role, User};
use crate::database::utils::sql;

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            INSERT INTO
                users (email, password_hash, name, role)
            VALUES
                (?, ?, ?, ?)
            RETURNING
                {USER_COLUMNS}
            "#
        )))
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Locations a submitter may enter payroll for.
    pub async fn location_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT location_id FROM user_locations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    pub async fn assign_location(&self, user_id: Uuid, location_id: Uuid) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_locations (user_id, location_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(location_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
