use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Location, LocationInput};
use crate::database::utils::sql;

const LOCATION_COLUMNS: &str = "id, name, organization_id, created_at, updated_at";

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_location(&self, input: &LocationInput) -> Result<Location> {
        let location = sqlx::query_as::<_, Location>(&sql(&format!(
            r#"
            INSERT INTO
                locations (name, organization_id)
            VALUES
                (?, ?)
            RETURNING
                {LOCATION_COLUMNS}
            "#
        )))
        .bind(&input.name)
        .bind(input.organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location)
    }

}
