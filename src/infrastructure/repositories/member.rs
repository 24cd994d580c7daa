use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::member::{Member, MemberRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_member(row: &PgRow) -> Result<Member, DomainError> {
    let err = row_error("member");
    Ok(Member::restore(
        row.try_get("id").map_err(&err)?,
        row.try_get("first_name").map_err(&err)?,
        row.try_get("last_name").map_err(&err)?,
        row.try_get("password_hash").map_err(&err)?,
        row.try_get("email").map_err(&err)?,
        row.try_get("birthday").map_err(&err)?,
        row.try_get("profile_image_id").map_err(&err)?,
    ))
}

const COLUMNS: &str = "id, first_name, last_name, password_hash, email, birthday, profile_image_id";

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn get(&self, id: i64) -> Result<Option<Member>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM members WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load member", e))?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Member>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM members WHERE email = $1", COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load member", e))?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn create(&self, member: Member) -> Result<Member, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO members (first_name, last_name, password_hash, email, birthday)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(member.first_name())
        .bind(member.last_name())
        .bind(member.password_hash())
        .bind(member.email())
        .bind(member.birthday())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create member", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("member"))?;

        Ok(Member::restore(
            id,
            member.first_name().to_string(),
            member.last_name().to_string(),
            member.password_hash().to_string(),
            member.email().to_string(),
            member.birthday(),
            member.profile_image_id(),
        ))
    }

    async fn update(&self, member: &Member) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET first_name = $1, last_name = $2, password_hash = $3, email = $4,
                birthday = $5, profile_image_id = $6
            WHERE id = $7
            "#,
        )
        .bind(member.first_name())
        .bind(member.last_name())
        .bind(member.password_hash())
        .bind(member.email())
        .bind(member.birthday())
        .bind(member.profile_image_id())
        .bind(member.id())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to update member", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Member '{}' not found",
                member.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete member", e))?;

        Ok(result.rows_affected() > 0)
    }
}
