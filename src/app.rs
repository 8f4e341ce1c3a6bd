use std::sync::Arc;

use anyhow::Context;

use crate::adapters::{
    GcsStorageGateway, GoogleOAuthCredentials, HttpCoordinatorClient, OAuthClientConfig,
};
use crate::cli::Cli;
use crate::core::errors::CredentialError;
use crate::core::interfaces::adapters::{CredentialProvider, StorageGateway};
use crate::core::interfaces::ports::CaptureInvoker;
use crate::core::models::{AppConfig, Settings};
use crate::core::orchestrators::{BucketBootstrap, PollLoop};
use crate::global_constants::{LOG_TAG_MAIN, LOG_TAG_OAUTH, USER_MESSAGE_VISIT_AUTH_URL};
use crate::ports::{CommandCaptureInvoker, SkipCaptureInvoker};
use crate::utils;

pub struct RelayApp {
    poll_loop: PollLoop,
}

impl RelayApp {
    pub async fn build(cli: &Cli) -> anyhow::Result<Self> {
        log::info!("{} Initializing relay", LOG_TAG_MAIN);

        let config = AppConfig::load(&cli.config_file)?;
        let settings = Settings::from_config(&config);
        log::debug!("{} {:#?}", LOG_TAG_MAIN, settings);

        utils::ensure_single_instance(&utils::default_lock_file_path())?;

        let credentials = Self::authorize(cli, &config, &settings).await?;

        let storage: Arc<dyn StorageGateway> = Arc::new(GcsStorageGateway::build(
            settings.storage_api_base_url.clone(),
            credentials,
            settings.request_timeout,
        )?);

        BucketBootstrap::build(Arc::clone(&storage))
            .ensure_bucket(&settings.project_id, &settings.bucket_name)
            .await
            .with_context(|| format!("Failed creating bucket {}", settings.bucket_name))?;

        let coordinator = Arc::new(HttpCoordinatorClient::build(
            settings.coordinator_base_url.clone(),
            settings.request_timeout,
        )?);

        let capture_invoker: Arc<dyn CaptureInvoker> = if cli.test_mode {
            log::warn!("{} Test mode enabled, the camera will not be used", LOG_TAG_MAIN);
            Arc::new(SkipCaptureInvoker::initialize(settings.image_path.clone()))
        } else {
            Arc::new(CommandCaptureInvoker::initialize(
                settings.capture_command.clone(),
                settings.capture_args.clone(),
                settings.image_path.clone(),
            ))
        };

        let poll_loop = PollLoop::build(coordinator, capture_invoker, storage, settings);

        Ok(Self { poll_loop })
    }

    async fn authorize(
        cli: &Cli,
        config: &AppConfig,
        settings: &Settings,
    ) -> anyhow::Result<Arc<dyn CredentialProvider>> {
        let oauth_config =
            OAuthClientConfig::google(settings.client_id.clone(), settings.client_secret.clone());
        let auth_code_url = oauth_config.auth_code_url();

        match GoogleOAuthCredentials::authorize(
            oauth_config,
            cli.cache_file.clone(),
            cli.authorization_code(&config.oauth_code),
            settings.request_timeout,
        )
        .await
        {
            Ok(credentials) => Ok(Arc::new(credentials)),
            Err(CredentialError::AuthorizationRequired) => {
                println!("{}", USER_MESSAGE_VISIT_AUTH_URL);
                println!("{}", auth_code_url);

                if cli.open_browser {
                    if let Err(e) = open::that(&auth_code_url) {
                        log::warn!("{} Failed to open browser: {}", LOG_TAG_OAUTH, e);
                    }
                }

                anyhow::bail!("an authorization code is required to continue")
            }
            Err(e) => Err(anyhow::Error::new(e).context("Exchange failed")),
        }
    }

    /// Only returns once the poll loop hits a fatal error.
    pub async fn run(mut self) -> anyhow::Result<()> {
        log::info!("{} Entering poll loop", LOG_TAG_MAIN);

        let fatal = self.poll_loop.run().await;
        Err(anyhow::Error::new(fatal).context("Dying with error"))
    }
}
