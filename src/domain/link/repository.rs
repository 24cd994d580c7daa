use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::link::Link;

#[async_trait]
pub trait LinkRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i64) -> Result<Option<Link>, DomainError>;

    async fn create(&self, link: Link) -> Result<Link, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Link>, DomainError>;
}
