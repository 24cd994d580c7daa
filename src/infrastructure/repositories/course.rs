use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::course::{Course, CourseRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_course(row: &PgRow) -> Result<Course, DomainError> {
    let err = row_error("course");
    Ok(Course {
        id: row.try_get("id").map_err(&err)?,
        name: row.try_get("name").map_err(&err)?,
        instructor: row.try_get("instructor").map_err(&err)?,
        phone_number: row.try_get("phone_number").map_err(&err)?,
        email: row.try_get("email").map_err(&err)?,
        description: row.try_get("description").map_err(&err)?,
        price: row.try_get("price").map_err(&err)?,
        max_participants: row.try_get("max_participants").map_err(&err)?,
        category: row.try_get("category").map_err(&err)?,
        difficulty: row.try_get("difficulty").map_err(&err)?,
        equipment: row.try_get("equipment").map_err(&err)?,
        requirements: row.try_get("requirements").map_err(&err)?,
        trial_day: row.try_get("trial_day").map_err(&err)?,
        is_private: row.try_get("is_private").map_err(&err)?,
        is_published: row.try_get("is_published").map_err(&err)?,
        provider_id: row.try_get("provider_id").map_err(&err)?,
        profile_image_id: row.try_get("profile_image_id").map_err(&err)?,
    })
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn get(&self, id: i64) -> Result<Option<Course>, DomainError> {
        let row = sqlx::query("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load course", e))?;

        row.as_ref().map(row_to_course).transpose()
    }

    async fn create(&self, course: Course) -> Result<Course, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO courses
                (name, instructor, phone_number, email, description, price,
                 max_participants, category, difficulty, equipment, requirements,
                 trial_day, is_private, is_published, provider_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            "#,
        )
        .bind(&course.name)
        .bind(&course.instructor)
        .bind(&course.phone_number)
        .bind(&course.email)
        .bind(&course.description)
        .bind(course.price)
        .bind(course.max_participants)
        .bind(&course.category)
        .bind(&course.difficulty)
        .bind(&course.equipment)
        .bind(&course.requirements)
        .bind(course.trial_day)
        .bind(course.is_private)
        .bind(course.is_published)
        .bind(course.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create course", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("course"))?;

        Ok(Course { id, ..course })
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET name = $1, instructor = $2, phone_number = $3, email = $4,
                description = $5, price = $6, max_participants = $7, category = $8,
                difficulty = $9, equipment = $10, requirements = $11, trial_day = $12,
                is_private = $13, is_published = $14, profile_image_id = $15
            WHERE id = $16
            "#,
        )
        .bind(&course.name)
        .bind(&course.instructor)
        .bind(&course.phone_number)
        .bind(&course.email)
        .bind(&course.description)
        .bind(course.price)
        .bind(course.max_participants)
        .bind(&course.category)
        .bind(&course.difficulty)
        .bind(&course.equipment)
        .bind(&course.requirements)
        .bind(course.trial_day)
        .bind(course.is_private)
        .bind(course.is_published)
        .bind(course.profile_image_id)
        .bind(course.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to update course", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Course '{}' not found",
                course.id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete course", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_published(&self) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.* FROM courses c
            JOIN providers p ON p.id = c.provider_id
            WHERE c.is_published = TRUE AND p.is_published = TRUE
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list courses", e))?;

        rows.iter().map(row_to_course).collect()
    }

    async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query("SELECT * FROM courses WHERE provider_id = $1 ORDER BY id")
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to list courses", e))?;

        rows.iter().map(row_to_course).collect()
    }

    async fn list_for_member(&self, member_id: i64) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.* FROM courses c
            JOIN members_courses mc ON mc.course_id = c.id
            WHERE mc.member_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list courses", e))?;

        rows.iter().map(row_to_course).collect()
    }

    async fn member_ids(&self, course_id: i64) -> Result<Vec<i64>, DomainError> {
        sqlx::query_scalar("SELECT member_id FROM members_courses WHERE course_id = $1 ORDER BY member_id")
            .bind(course_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to list enrollment", e))
    }

    async fn set_members(&self, course_id: i64, member_ids: &[i64]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("Failed to start transaction", e))?;

        sqlx::query("DELETE FROM members_courses WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error("Failed to clear enrollment", e))?;

        for member_id in member_ids {
            sqlx::query(
                "INSERT INTO members_courses (member_id, course_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(member_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error("Failed to store enrollment", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit enrollment", e))?;

        Ok(())
    }
}
