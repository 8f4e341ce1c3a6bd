use std::sync::Arc;

use crate::core::errors::StorageError;
use crate::core::interfaces::adapters::StorageGateway;
use crate::global_constants::LOG_TAG_BOOTSTRAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    AlreadyExisted,
    Created,
}

pub struct BucketBootstrap {
    storage: Arc<dyn StorageGateway>,
}

impl BucketBootstrap {
    pub fn build(storage: Arc<dyn StorageGateway>) -> Self {
        Self { storage }
    }

    /// Makes sure `bucket` exists before the poll loop starts. Only a failed
    /// creation is an error; a failed existence check falls through to
    /// creation.
    pub async fn ensure_bucket(
        &self,
        project_id: &str,
        bucket: &str,
    ) -> Result<BucketStatus, StorageError> {
        match self.storage.bucket_exists(bucket).await {
            Ok(true) => {
                log::info!(
                    "{} Bucket {} already exists - skipping bucket creation",
                    LOG_TAG_BOOTSTRAP,
                    bucket
                );
                return Ok(BucketStatus::AlreadyExisted);
            }
            Ok(false) => {
                log::info!("{} Bucket {} not found", LOG_TAG_BOOTSTRAP, bucket);
            }
            Err(error) => {
                log::warn!(
                    "{} Could not check bucket {}: {}, attempting to create it",
                    LOG_TAG_BOOTSTRAP,
                    bucket,
                    error
                );
            }
        }

        self.storage.create_bucket(project_id, bucket).await?;
        log::info!(
            "{} Created bucket {} in project {}",
            LOG_TAG_BOOTSTRAP,
            bucket,
            project_id
        );

        Ok(BucketStatus::Created)
    }
}
