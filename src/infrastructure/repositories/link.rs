use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::link::{Link, LinkRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresLinkRepository {
    pool: PgPool,
}

impl PostgresLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_link(row: &PgRow) -> Result<Link, DomainError> {
    let err = row_error("link");
    Ok(Link {
        id: row.try_get("id").map_err(&err)?,
        link_text: row.try_get("link_text").map_err(&err)?,
        url: row.try_get("url").map_err(&err)?,
        provider_id: row.try_get("provider_id").map_err(&err)?,
    })
}

#[async_trait]
impl LinkRepository for PostgresLinkRepository {
    async fn get(&self, id: i64) -> Result<Option<Link>, DomainError> {
        let row = sqlx::query("SELECT * FROM links WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load link", e))?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn create(&self, link: Link) -> Result<Link, DomainError> {
        let row = sqlx::query(
            "INSERT INTO links (link_text, url, provider_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&link.link_text)
        .bind(&link.url)
        .bind(link.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create link", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("link"))?;

        Ok(Link { id, ..link })
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete link", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Link>, DomainError> {
        let rows = sqlx::query("SELECT * FROM links WHERE provider_id = $1 ORDER BY id")
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to list links", e))?;

        rows.iter().map(row_to_link).collect()
    }
}
