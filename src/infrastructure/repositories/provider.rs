use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::provider::{Address, Provider, ProviderRepository};
use crate::domain::DomainError;
use crate::infrastructure::repositories::{map_db_error, row_error};

#[derive(Debug, Clone)]
pub struct PostgresProviderRepository {
    pool: PgPool,
}

impl PostgresProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_provider(row: &PgRow) -> Result<Provider, DomainError> {
    let err = row_error("provider");
    Ok(Provider::restore(
        row.try_get("id").map_err(&err)?,
        row.try_get("name").map_err(&err)?,
        row.try_get("email").map_err(&err)?,
        row.try_get("password_hash").map_err(&err)?,
        row.try_get("description").map_err(&err)?,
        row.try_get("price").map_err(&err)?,
        row.try_get("contact_person").map_err(&err)?,
        row.try_get("phone_number").map_err(&err)?,
        row.try_get("category").map_err(&err)?,
        row.try_get("needs_approval").map_err(&err)?,
        row.try_get("is_published").map_err(&err)?,
        row.try_get("profile_image_id").map_err(&err)?,
    ))
}

fn row_to_address(row: &PgRow) -> Result<Address, DomainError> {
    let err = row_error("address");
    Ok(Address {
        id: row.try_get("id").map_err(&err)?,
        street: row.try_get("street").map_err(&err)?,
        zip: row.try_get("zip").map_err(&err)?,
        city: row.try_get("city").map_err(&err)?,
        country: row.try_get("country").map_err(&err)?,
        provider_id: row.try_get("provider_id").map_err(&err)?,
    })
}

const COLUMNS: &str = "id, name, email, password_hash, description, price, contact_person, \
                       phone_number, category, needs_approval, is_published, profile_image_id";

#[async_trait]
impl ProviderRepository for PostgresProviderRepository {
    async fn get(&self, id: i64) -> Result<Option<Provider>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM providers WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to load provider", e))?;

        row.as_ref().map(row_to_provider).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Provider>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM providers WHERE email = $1",
            COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to load provider", e))?;

        row.as_ref().map(row_to_provider).transpose()
    }

    async fn create(&self, provider: Provider) -> Result<Provider, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO providers
                (name, email, password_hash, description, price, contact_person,
                 phone_number, category, needs_approval, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(provider.name())
        .bind(provider.email())
        .bind(provider.password_hash())
        .bind(provider.description())
        .bind(provider.price())
        .bind(provider.contact_person())
        .bind(provider.phone_number())
        .bind(provider.category())
        .bind(provider.needs_approval())
        .bind(provider.is_published())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create provider", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("provider"))?;

        Ok(Provider::restore(
            id,
            provider.name().to_string(),
            provider.email().to_string(),
            provider.password_hash().to_string(),
            provider.description().to_string(),
            provider.price(),
            provider.contact_person().to_string(),
            provider.phone_number().map(str::to_string),
            provider.category().to_string(),
            provider.needs_approval(),
            provider.is_published(),
            provider.profile_image_id(),
        ))
    }

    async fn update(&self, provider: &Provider) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE providers
            SET name = $1, email = $2, password_hash = $3, description = $4, price = $5,
                contact_person = $6, phone_number = $7, category = $8, needs_approval = $9,
                is_published = $10, profile_image_id = $11
            WHERE id = $12
            "#,
        )
        .bind(provider.name())
        .bind(provider.email())
        .bind(provider.password_hash())
        .bind(provider.description())
        .bind(provider.price())
        .bind(provider.contact_person())
        .bind(provider.phone_number())
        .bind(provider.category())
        .bind(provider.needs_approval())
        .bind(provider.is_published())
        .bind(provider.profile_image_id())
        .bind(provider.id())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to update provider", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Provider '{}' not found",
                provider.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete provider", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_published(&self) -> Result<Vec<Provider>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM providers WHERE is_published = TRUE ORDER BY id",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list providers", e))?;

        rows.iter().map(row_to_provider).collect()
    }

    async fn list_for_member(&self, member_id: i64) -> Result<Vec<Provider>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT p.* FROM providers p
            JOIN members_providers mp ON mp.provider_id = p.id
            WHERE mp.member_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list providers", e))?;

        rows.iter().map(row_to_provider).collect()
    }

    async fn get_address(&self, provider_id: i64) -> Result<Option<Address>, DomainError> {
        let row = sqlx::query(
            "SELECT id, street, zip, city, country, provider_id FROM addresses WHERE provider_id = $1",
        )
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to load address", e))?;

        row.as_ref().map(row_to_address).transpose()
    }

    async fn upsert_address(&self, address: Address) -> Result<Address, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO addresses (street, zip, city, country, provider_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (provider_id) DO UPDATE
            SET street = EXCLUDED.street, zip = EXCLUDED.zip,
                city = EXCLUDED.city, country = EXCLUDED.country
            RETURNING id
            "#,
        )
        .bind(&address.street)
        .bind(&address.zip)
        .bind(&address.city)
        .bind(&address.country)
        .bind(address.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to store address", e))?;

        let id: i64 = row.try_get("id").map_err(row_error("address"))?;

        Ok(Address { id, ..address })
    }
}
