use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::principal::PrincipalType;
use crate::domain::token::{AuthToken, TokenRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_token(row: &PgRow) -> Result<AuthToken, DomainError> {
    let err = row_error("auth token");
    let principal_type: String = row.try_get("principal_type").map_err(&err)?;

    Ok(AuthToken {
        id: row.try_get("id").map_err(&err)?,
        token: row.try_get("token").map_err(&err)?,
        expires_at: row.try_get("expires_at").map_err(&err)?,
        principal_type: PrincipalType::parse(&principal_type)?,
        principal_id: row.try_get("principal_id").map_err(&err)?,
    })
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn get_by_token(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<Option<AuthToken>, DomainError> {
        let row = sqlx::query("SELECT * FROM auth_tokens WHERE principal_type = $1 AND token = $2")
            .bind(principal_type.as_str())
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load token", e))?;

        row.as_ref().map(row_to_token).transpose()
    }

    async fn create(&self, token: AuthToken) -> Result<AuthToken, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO auth_tokens (token, expires_at, principal_type, principal_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.principal_type.as_str())
        .bind(token.principal_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to store token", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("auth token"))?;

        Ok(AuthToken { id, ..token })
    }

    async fn delete_by_token(
        &self,
        principal_type: PrincipalType,
        token: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE principal_type = $1 AND token = $2")
            .bind(principal_type.as_str())
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_principal(
        &self,
        principal_type: PrincipalType,
        principal_id: i64,
    ) -> Result<u64, DomainError> {
        let result =
            sqlx::query("DELETE FROM auth_tokens WHERE principal_type = $1 AND principal_id = $2")
                .bind(principal_type.as_str())
                .bind(principal_id)
                .execute(&self.pool)
                .await
                .map_err(|e| map_db_error("Failed to delete tokens", e))?;

        Ok(result.rows_affected())
    }
}
