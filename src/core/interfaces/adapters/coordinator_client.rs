use async_trait::async_trait;

use crate::core::errors::CoordinatorError;
use crate::core::models::{NotifyPayload, PollSignal};

#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    async fn check_for_request(&self, location_id: &str) -> Result<PollSignal, CoordinatorError>;

    async fn notify_new_image(
        &self,
        location_id: &str,
        payload: &NotifyPayload,
    ) -> Result<(), CoordinatorError>;
}
