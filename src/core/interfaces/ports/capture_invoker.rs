use async_trait::async_trait;

use crate::core::errors::CaptureError;
use crate::core::models::CaptureResult;

#[async_trait]
pub trait CaptureInvoker: Send + Sync {
    async fn capture(&self) -> Result<CaptureResult, CaptureError>;
}
