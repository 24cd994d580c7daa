//! Object storage for uploaded images.

pub mod in_memory;
pub mod s3;

use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Blob storage boundary. `put` returns the public URL of the stored object.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, DomainError>;

    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}

pub use in_memory::InMemoryObjectStore;
pub use s3::S3ObjectStore;
