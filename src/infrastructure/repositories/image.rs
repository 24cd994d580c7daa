use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::image::{Image, ImageOwner, ImageRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresImageRepository {
    pool: PgPool,
}

impl PostgresImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_image(row: &PgRow) -> Result<Image, DomainError> {
    let err = row_error("image");
    let owner_type: String = row.try_get("owner_type").map_err(&err)?;
    let owner_id: i64 = row.try_get("owner_id").map_err(&err)?;

    Ok(Image {
        id: row.try_get("id").map_err(&err)?,
        url: row.try_get("url").map_err(&err)?,
        key: row.try_get("key").map_err(&err)?,
        owner: ImageOwner::from_parts(&owner_type, owner_id)?,
    })
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn get(&self, id: i64) -> Result<Option<Image>, DomainError> {
        let row = sqlx::query("SELECT * FROM images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load image", e))?;

        row.as_ref().map(row_to_image).transpose()
    }

    async fn create(&self, image: Image) -> Result<Image, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO images (url, key, owner_type, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&image.url)
        .bind(&image.key)
        .bind(image.owner.kind())
        .bind(image.owner.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create image", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("image"))?;

        Ok(Image { id, ..image })
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete image", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_owner(&self, owner: ImageOwner) -> Result<Vec<Image>, DomainError> {
        let rows =
            sqlx::query("SELECT * FROM images WHERE owner_type = $1 AND owner_id = $2 ORDER BY id")
                .bind(owner.kind())
                .bind(owner.id())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_db_error("Failed to list images", e))?;

        rows.iter().map(row_to_image).collect()
    }
}
