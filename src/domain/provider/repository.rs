use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::provider::{Address, Provider};

#[async_trait]
pub trait ProviderRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i64) -> Result<Option<Provider>, DomainError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Provider>, DomainError>;

    async fn create(&self, provider: Provider) -> Result<Provider, DomainError>;

    async fn update(&self, provider: &Provider) -> Result<(), DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Published providers only, ordered by id.
    async fn list_published(&self) -> Result<Vec<Provider>, DomainError>;

    /// Providers a member is associated with.
    async fn list_for_member(&self, member_id: i64) -> Result<Vec<Provider>, DomainError>;

    async fn get_address(&self, provider_id: i64) -> Result<Option<Address>, DomainError>;

    /// Insert or replace the provider's address, returning the stored row.
    async fn upsert_address(&self, address: Address) -> Result<Address, DomainError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
