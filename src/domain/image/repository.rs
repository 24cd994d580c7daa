use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::image::{Image, ImageOwner};

#[async_trait]
pub trait ImageRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: i64) -> Result<Option<Image>, DomainError>;

    async fn create(&self, image: Image) -> Result<Image, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    async fn list_for_owner(&self, owner: ImageOwner) -> Result<Vec<Image>, DomainError>;
}
