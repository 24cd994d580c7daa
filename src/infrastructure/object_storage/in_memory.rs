use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::error::DomainError;
use crate::infrastructure::object_storage::ObjectStore;

/// In-memory object store for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, DomainError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| DomainError::internal("Object store lock poisoned"))?;
        objects.insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(format!("https://storage.test/{}", key))
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| DomainError::internal("Object store lock poisoned"))?;
        objects.remove(key);
        Ok(())
    }
}
