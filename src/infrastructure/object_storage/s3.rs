use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::config::ObjectStorageConfig;
use crate::domain::error::DomainError;
use crate::infrastructure::object_storage::ObjectStore;

/// S3-backed object store.
#[derive(Debug)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS environment (credentials chain,
    /// region) plus the app's object-storage config.
    pub async fn from_config(config: &ObjectStorageConfig) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&aws_config);

        let public_base_url = config
            .public_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.s3.amazonaws.com", config.bucket));

        Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, DomainError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| DomainError::object_storage(format!("Failed to upload object: {}", e)))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DomainError::object_storage(format!("Failed to delete object: {}", e)))?;

        Ok(())
    }
}
