use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::image::{Image, ImageOwner, ImageRepository};
use crate::domain::DomainError;
use crate::infrastructure::object_storage::ObjectStore;

/// A file received through a multipart upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    fn extension(&self) -> &str {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
    }

    fn content_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Uploads go to object storage first, then into the images table; a failed
/// row insert rolls the object back best-effort.
#[derive(Debug, Clone)]
pub struct ImageService {
    images: Arc<dyn ImageRepository>,
    store: Arc<dyn ObjectStore>,
}

impl ImageService {
    pub fn new(images: Arc<dyn ImageRepository>, store: Arc<dyn ObjectStore>) -> Self {
        Self { images, store }
    }

    pub async fn find(&self, id: i64) -> Result<Image, DomainError> {
        self.images
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Image '{}' not found", id)))
    }

    pub async fn list_for_owner(&self, owner: ImageOwner) -> Result<Vec<Image>, DomainError> {
        self.images.list_for_owner(owner).await
    }

    pub async fn upload(&self, owner: ImageOwner, file: &FileUpload) -> Result<Image, DomainError> {
        let key = format!(
            "{}/{}{}.{}",
            owner.kind(),
            Uuid::new_v4(),
            owner.id(),
            file.extension()
        );

        let url = self
            .store
            .put(&key, file.bytes.clone(), &file.content_type())
            .await?;

        let image = Image::new(owner, url, key.clone())?;
        match self.images.create(image).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                let _ = self.store.delete(&key).await;
                Err(e)
            }
        }
    }

    /// Remove the object, then the row.
    pub async fn delete(&self, image: &Image) -> Result<(), DomainError> {
        self.store.delete(&image.key).await?;
        self.images.delete(image.id).await?;
        Ok(())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        let image = self.find(id).await?;
        self.delete(&image).await
    }

    pub async fn delete_for_owner(&self, owner: ImageOwner) -> Result<(), DomainError> {
        for image in self.images.list_for_owner(owner).await? {
            self.delete(&image).await?;
        }
        Ok(())
    }
}
