use async_trait::async_trait;

use crate::core::errors::StorageError;
use crate::core::models::UploadedImage;

#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// `Ok(false)` only when the service reports the bucket as absent.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError>;

    async fn create_bucket(&self, project_id: &str, bucket: &str) -> Result<(), StorageError>;

    async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadedImage, StorageError>;

    /// Grants read access on the object to everyone.
    async fn make_public(&self, bucket: &str, object_name: &str) -> Result<(), StorageError>;

    async fn delete_object(&self, bucket: &str, object_name: &str) -> Result<(), StorageError>;
}
