use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::course_date::{CourseDate, CourseDateRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresCourseDateRepository {
    pool: PgPool,
}

impl PostgresCourseDateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_date(row: &PgRow) -> Result<CourseDate, DomainError> {
    let err = row_error("course date");
    Ok(CourseDate {
        id: row.try_get("id").map_err(&err)?,
        starts_at: row.try_get("starts_at").map_err(&err)?,
        ends_at: row.try_get("ends_at").map_err(&err)?,
        street: row.try_get("street").map_err(&err)?,
        zip: row.try_get("zip").map_err(&err)?,
        city: row.try_get("city").map_err(&err)?,
        country: row.try_get("country").map_err(&err)?,
        course_id: row.try_get("course_id").map_err(&err)?,
    })
}

#[async_trait]
impl CourseDateRepository for PostgresCourseDateRepository {
    async fn get(&self, id: i64) -> Result<Option<CourseDate>, DomainError> {
        let row = sqlx::query("SELECT * FROM course_dates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load course date", e))?;

        row.as_ref().map(row_to_date).transpose()
    }

    async fn create(&self, date: CourseDate) -> Result<CourseDate, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO course_dates (starts_at, ends_at, street, zip, city, country, course_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(date.starts_at)
        .bind(date.ends_at)
        .bind(&date.street)
        .bind(&date.zip)
        .bind(&date.city)
        .bind(&date.country)
        .bind(date.course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create course date", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("course date"))?;

        Ok(CourseDate { id, ..date })
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM course_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete course date", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_course(&self, course_id: i64) -> Result<Vec<CourseDate>, DomainError> {
        let rows =
            sqlx::query("SELECT * FROM course_dates WHERE course_id = $1 ORDER BY starts_at")
                .bind(course_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_db_error("Failed to list course dates", e))?;

        rows.iter().map(row_to_date).collect()
    }

    async fn delete_for_course(&self, course_id: i64) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM course_dates WHERE course_id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete course dates", e))?;

        Ok(result.rows_affected())
    }
}
