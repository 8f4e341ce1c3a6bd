use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::core::errors::CoordinatorError;
use crate::core::interfaces::adapters::CoordinatorClient;
use crate::core::models::{NotifyPayload, PollSignal};
use crate::global_constants::{COORDINATOR_CHECK_PATH, COORDINATOR_UPDATE_PATH, LOG_TAG_COORDINATOR};

pub struct HttpCoordinatorClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCoordinatorClient {
    pub fn build(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build coordinator HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint_url(&self, path: &str, location_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(location_id)
        )
    }
}

#[async_trait]
impl CoordinatorClient for HttpCoordinatorClient {
    async fn check_for_request(&self, location_id: &str) -> Result<PollSignal, CoordinatorError> {
        let url = self.endpoint_url(COORDINATOR_CHECK_PATH, location_id);

        let response = self.client.get(&url).send().await.map_err(|source| {
            CoordinatorError::Network {
                url: url.clone(),
                source,
            }
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| CoordinatorError::Network {
                url: url.clone(),
                source,
            })?;

        log::debug!(
            "{} JSON received from {}: {}",
            LOG_TAG_COORDINATOR,
            url,
            body
        );

        if !status.is_success() {
            return Err(CoordinatorError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let signal =
            PollSignal::parse(&body).map_err(|source| CoordinatorError::Protocol { url, source })?;
        log::debug!("{} {:?}", LOG_TAG_COORDINATOR, signal);

        Ok(signal)
    }

    async fn notify_new_image(
        &self,
        location_id: &str,
        payload: &NotifyPayload,
    ) -> Result<(), CoordinatorError> {
        let url = self.endpoint_url(COORDINATOR_UPDATE_PATH, location_id);
        log::info!(
            "{} Updating server at {} with {}",
            LOG_TAG_COORDINATOR,
            url,
            payload.latest_image_url
        );

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| CoordinatorError::Network {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        log::info!(
            "{} Response received from POST to {}: {}",
            LOG_TAG_COORDINATOR,
            url,
            body
        );

        if !status.is_success() {
            return Err(CoordinatorError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
