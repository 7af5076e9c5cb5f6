use async_trait::async_trait;

use crate::domain::{models::StorageKey, StorageError};

#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    /// Whether bucket and credentials are present.
    fn is_configured(&self) -> bool;

    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Deleting a missing key succeeds.
    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError>;

    fn url_for(&self, key: &StorageKey) -> Result<String, StorageError>;
}
