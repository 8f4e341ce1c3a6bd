use std::sync::Arc;

use crate::core::errors::{CycleError, FailureClass};
use crate::core::interfaces::adapters::{CoordinatorClient, StorageGateway};
use crate::core::interfaces::ports::CaptureInvoker;
use crate::core::models::{
    CaptureResult, LoopState, NotifyPayload, ObjectNamer, Settings, UploadedImage,
};
use crate::global_constants::{IMAGE_CONTENT_TYPE, LOG_TAG_POLL_LOOP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoRequest,
    Published {
        image: UploadedImage,
        notified: bool,
    },
}

/// Drives the poll → capture → upload → publish → notify sequence. One cycle
/// runs at a time and every step is awaited before the next one starts.
pub struct PollLoop {
    coordinator: Arc<dyn CoordinatorClient>,
    capture_invoker: Arc<dyn CaptureInvoker>,
    storage: Arc<dyn StorageGateway>,
    settings: Settings,
    object_namer: ObjectNamer,
    state: LoopState,
    iteration: u64,
}

impl PollLoop {
    pub fn build(
        coordinator: Arc<dyn CoordinatorClient>,
        capture_invoker: Arc<dyn CaptureInvoker>,
        storage: Arc<dyn StorageGateway>,
        settings: Settings,
    ) -> Self {
        let object_namer = ObjectNamer::with_prefix(settings.object_prefix.clone());

        Self {
            coordinator,
            capture_invoker,
            storage,
            settings,
            object_namer,
            state: LoopState::Idle,
            iteration: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Runs until a fatal error occurs and hands that error back.
    pub async fn run(&mut self) -> CycleError {
        loop {
            self.iteration += 1;
            log::info!(
                "{} In update/check loop. Count: {}",
                LOG_TAG_POLL_LOOP,
                self.iteration
            );

            tokio::time::sleep(self.settings.poll_interval).await;

            match self.run_cycle().await {
                Ok(CycleOutcome::NoRequest) => {}
                Ok(CycleOutcome::Published { image, notified }) => {
                    log::info!(
                        "{} published {} (coordinator notified: {})",
                        LOG_TAG_POLL_LOOP,
                        image.media_url,
                        notified
                    );
                }
                Err(error) if error.class() == FailureClass::Transient => {
                    log::warn!(
                        "{} {}, retrying after {:?}",
                        LOG_TAG_POLL_LOOP,
                        error,
                        self.settings.poll_interval
                    );
                    self.enter(LoopState::Idle);
                }
                Err(error) => {
                    log::error!(
                        "{} fatal error while {}: {}",
                        LOG_TAG_POLL_LOOP,
                        self.state,
                        error
                    );
                    return error;
                }
            }
        }
    }

    /// One iteration without the interval sleep.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        self.enter(LoopState::Polling);
        let signal = self
            .coordinator
            .check_for_request(&self.settings.location_name)
            .await
            .map_err(CycleError::Poll)?;

        if !signal.new_pic_requested {
            log::debug!("{} no picture requested", LOG_TAG_POLL_LOOP);
            self.enter(LoopState::Idle);
            return Ok(CycleOutcome::NoRequest);
        }

        log::info!(
            "{} Taking picture. Count is: {}",
            LOG_TAG_POLL_LOOP,
            self.iteration
        );
        self.enter(LoopState::Capturing);
        let capture = self.capture_invoker.capture().await?;

        self.enter(LoopState::Uploading);
        let image = self.handle_upload(&capture).await?;

        self.enter(LoopState::SettingVisibility);
        self.handle_make_public(&image).await?;

        self.enter(LoopState::Notifying);
        let notified = self.handle_notify(&image).await;

        self.enter(LoopState::Idle);
        Ok(CycleOutcome::Published { image, notified })
    }

    fn enter(&mut self, next: LoopState) {
        log::trace!("{} {} -> {}", LOG_TAG_POLL_LOOP, self.state, next);
        self.state = next;
    }

    async fn handle_upload(&mut self, capture: &CaptureResult) -> Result<UploadedImage, CycleError> {
        let content = tokio::fs::read(capture.image_path())
            .await
            .map_err(|source| CycleError::ReadImage {
                path: capture.image_path().to_path_buf(),
                source,
            })?;

        let object_name = self.object_namer.next_name();
        log::info!(
            "{} Inserting picture into bucket {} as {} ({} bytes)",
            LOG_TAG_POLL_LOOP,
            self.settings.bucket_name,
            object_name,
            content.len()
        );

        let image = self
            .storage
            .upload_object(
                &self.settings.bucket_name,
                &object_name,
                content,
                IMAGE_CONTENT_TYPE,
            )
            .await
            .map_err(|source| CycleError::Upload {
                object_name: object_name.clone(),
                source,
            })?;

        log::info!(
            "{} Created object with media at: {}",
            LOG_TAG_POLL_LOOP,
            image.media_url
        );
        Ok(image)
    }

    async fn handle_make_public(&self, image: &UploadedImage) -> Result<(), CycleError> {
        let bucket = &self.settings.bucket_name;
        let attempts = self.settings.visibility_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.storage.make_public(bucket, &image.object_name).await {
                Ok(()) => {
                    log::info!(
                        "{} {}/{} is now publicly readable",
                        LOG_TAG_POLL_LOOP,
                        bucket,
                        image.object_name
                    );
                    return Ok(());
                }
                Err(error) if attempt < attempts => {
                    log::warn!(
                        "{} attempt {}/{} to publish {}/{} failed: {}",
                        LOG_TAG_POLL_LOOP,
                        attempt,
                        attempts,
                        bucket,
                        image.object_name,
                        error
                    );
                    tokio::time::sleep(self.settings.visibility_retry_delay).await;
                }
                Err(error) => {
                    self.handle_compensating_delete(image).await;
                    return Err(CycleError::Visibility {
                        object_name: image.object_name.clone(),
                        attempts,
                        source: error,
                    });
                }
            }
        }
    }

    async fn handle_compensating_delete(&self, image: &UploadedImage) {
        let bucket = &self.settings.bucket_name;
        match self.storage.delete_object(bucket, &image.object_name).await {
            Ok(()) => log::warn!(
                "{} deleted {}/{} because it could not be made public",
                LOG_TAG_POLL_LOOP,
                bucket,
                image.object_name
            ),
            Err(error) => log::error!(
                "{} {}/{} is stored but not public and could not be deleted: {}",
                LOG_TAG_POLL_LOOP,
                bucket,
                image.object_name,
                error
            ),
        }
    }

    async fn handle_notify(&self, image: &UploadedImage) -> bool {
        let payload = NotifyPayload::for_image(image);

        match self
            .coordinator
            .notify_new_image(&self.settings.location_name, &payload)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                log::warn!("{} {}", LOG_TAG_POLL_LOOP, error);
                false
            }
        }
    }
}
