use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::errors::CaptureError;
use crate::core::interfaces::ports::CaptureInvoker;
use crate::core::models::CaptureResult;
use crate::global_constants::LOG_TAG_CAPTURE;

/// Runs the camera tool and hands back the file it wrote.
pub struct CommandCaptureInvoker {
    command: String,
    args: Vec<String>,
    image_path: PathBuf,
}

impl CommandCaptureInvoker {
    pub fn initialize(
        command: impl Into<String>,
        args: Vec<String>,
        image_path: impl Into<PathBuf>,
    ) -> Self {
        let invoker = Self {
            command: command.into(),
            args,
            image_path: image_path.into(),
        };
        log::debug!(
            "{} initialized with {} {:?} -> {:?}",
            LOG_TAG_CAPTURE,
            invoker.command,
            invoker.args,
            invoker.image_path
        );
        invoker
    }
}

#[async_trait]
impl CaptureInvoker for CommandCaptureInvoker {
    async fn capture(&self) -> Result<CaptureResult, CaptureError> {
        log::info!(
            "{} running {} {}",
            LOG_TAG_CAPTURE,
            self.command,
            self.args.join(" ")
        );

        let status = Command::new(&self.command)
            .args(&self.args)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| CaptureError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(CaptureError::ExitStatus {
                command: self.command.clone(),
                args: self.args.clone(),
                status,
            });
        }

        if !tokio::fs::try_exists(&self.image_path).await.unwrap_or(false) {
            return Err(CaptureError::MissingImage(self.image_path.clone()));
        }

        Ok(CaptureResult::at_path(self.image_path.clone()))
    }
}

/// Test mode: no camera is touched, whatever already sits at the image path
/// is treated as the new capture.
pub struct SkipCaptureInvoker {
    image_path: PathBuf,
}

impl SkipCaptureInvoker {
    pub fn initialize(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
        }
    }
}

#[async_trait]
impl CaptureInvoker for SkipCaptureInvoker {
    async fn capture(&self) -> Result<CaptureResult, CaptureError> {
        log::info!(
            "{} test mode, reusing {:?} without running the camera",
            LOG_TAG_CAPTURE,
            self.image_path
        );
        Ok(CaptureResult::at_path(self.image_path.clone()))
    }
}
