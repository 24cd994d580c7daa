//! Database migrations infrastructure

use sqlx::postgres::PgPool;

use crate::domain::DomainError;

/// PostgreSQL migrator with an embedded migration list
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration
    pub async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        // Check if already applied
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(());
        }

        sqlx::query(&migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        Ok(())
    }

    /// Reverts a single migration
    pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if !applied {
            return Ok(());
        }

        sqlx::query(&migration.down)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        Ok(())
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> =
            sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to get migration version: {}", e))
                })?;

        Ok(version)
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version (timestamp-based recommended)
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// The full schema, oldest first.
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create principal and course tables",
            r#"
            CREATE TABLE IF NOT EXISTS members (
                id BIGSERIAL PRIMARY KEY,
                first_name VARCHAR(25) NOT NULL,
                last_name VARCHAR(25) NOT NULL,
                password_hash TEXT NOT NULL,
                email VARCHAR(65) NOT NULL UNIQUE,
                birthday DATE
            );

            CREATE TABLE IF NOT EXISTS providers (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                email VARCHAR(65) NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                description TEXT NOT NULL,
                price NUMERIC(7,2) NOT NULL,
                contact_person VARCHAR(25) NOT NULL,
                phone_number VARCHAR(25),
                category VARCHAR(25) NOT NULL,
                needs_approval BOOLEAN NOT NULL DEFAULT FALSE,
                is_published BOOLEAN NOT NULL DEFAULT FALSE
            );

            CREATE TABLE IF NOT EXISTS addresses (
                id BIGSERIAL PRIMARY KEY,
                street VARCHAR(100) NOT NULL,
                zip VARCHAR(25) NOT NULL,
                city VARCHAR(35) NOT NULL,
                country VARCHAR(25) NOT NULL,
                provider_id BIGINT NOT NULL UNIQUE REFERENCES providers(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS links (
                id BIGSERIAL PRIMARY KEY,
                link_text VARCHAR(50) NOT NULL,
                url TEXT NOT NULL,
                provider_id BIGINT NOT NULL REFERENCES providers(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS courses (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                instructor VARCHAR(50),
                phone_number VARCHAR(25),
                email VARCHAR(65) NOT NULL,
                description TEXT NOT NULL,
                price NUMERIC(7,2) NOT NULL,
                max_participants INTEGER,
                category VARCHAR(25) NOT NULL,
                difficulty VARCHAR(25),
                equipment TEXT,
                requirements TEXT,
                trial_day BOOLEAN NOT NULL DEFAULT FALSE,
                is_private BOOLEAN NOT NULL DEFAULT FALSE,
                is_published BOOLEAN NOT NULL DEFAULT FALSE,
                provider_id BIGINT NOT NULL REFERENCES providers(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS course_dates (
                id BIGSERIAL PRIMARY KEY,
                starts_at TIMESTAMPTZ NOT NULL,
                ends_at TIMESTAMPTZ NOT NULL,
                street VARCHAR(100) NOT NULL,
                zip VARCHAR(25) NOT NULL,
                city VARCHAR(35) NOT NULL,
                country VARCHAR(25) NOT NULL,
                course_id BIGINT NOT NULL REFERENCES courses(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS members_courses (
                member_id BIGINT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                course_id BIGINT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
                PRIMARY KEY (member_id, course_id)
            );

            CREATE TABLE IF NOT EXISTS members_providers (
                member_id BIGINT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                provider_id BIGINT NOT NULL REFERENCES providers(id) ON DELETE CASCADE,
                PRIMARY KEY (member_id, provider_id)
            );

            CREATE INDEX IF NOT EXISTS idx_courses_provider ON courses(provider_id);
            CREATE INDEX IF NOT EXISTS idx_course_dates_course ON course_dates(course_id);
            CREATE INDEX IF NOT EXISTS idx_links_provider ON links(provider_id);
            "#,
            r#"
            DROP TABLE IF EXISTS members_providers;
            DROP TABLE IF EXISTS members_courses;
            DROP TABLE IF EXISTS course_dates;
            DROP TABLE IF EXISTS courses;
            DROP TABLE IF EXISTS links;
            DROP TABLE IF EXISTS addresses;
            DROP TABLE IF EXISTS providers;
            DROP TABLE IF EXISTS members;
            "#,
        ),
        Migration::new(
            2,
            "Create auth tokens table",
            r#"
            CREATE TABLE IF NOT EXISTS auth_tokens (
                id BIGSERIAL PRIMARY KEY,
                token VARCHAR(1000) NOT NULL UNIQUE,
                expires_at TIMESTAMPTZ NOT NULL,
                principal_type VARCHAR(10) NOT NULL,
                principal_id BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_auth_tokens_principal
                ON auth_tokens(principal_type, principal_id);
            "#,
            r#"
            DROP TABLE IF EXISTS auth_tokens;
            "#,
        ),
        Migration::new(
            3,
            "Create images table and profile image columns",
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id BIGSERIAL PRIMARY KEY,
                url TEXT NOT NULL,
                key TEXT NOT NULL,
                owner_type VARCHAR(10) NOT NULL,
                owner_id BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_images_owner ON images(owner_type, owner_id);

            ALTER TABLE members
                ADD COLUMN IF NOT EXISTS profile_image_id BIGINT
                REFERENCES images(id) ON DELETE SET NULL;
            ALTER TABLE providers
                ADD COLUMN IF NOT EXISTS profile_image_id BIGINT
                REFERENCES images(id) ON DELETE SET NULL;
            ALTER TABLE courses
                ADD COLUMN IF NOT EXISTS profile_image_id BIGINT
                REFERENCES images(id) ON DELETE SET NULL;
            "#,
            r#"
            ALTER TABLE courses DROP COLUMN IF EXISTS profile_image_id;
            ALTER TABLE providers DROP COLUMN IF EXISTS profile_image_id;
            ALTER TABLE members DROP COLUMN IF EXISTS profile_image_id;
            DROP TABLE IF EXISTS images;
            "#,
        ),
    ]
}

/// Runs all pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in schema_migrations() {
        migrator.run_migration(&migration).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test", "DROP TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
    }

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert!(!migrations.is_empty());

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_schema_migrations_content() {
        for migration in schema_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.is_empty());
            assert!(!migration.down.is_empty());
        }
    }
}
