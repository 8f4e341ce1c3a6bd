use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::models::object_name::default_object_prefix;
use crate::global_constants;

/// Contents of `config.toml`. Only the OAuth client fields are expected in a
/// typical deployment; everything else falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(rename = "clientId", default)]
    pub client_id: String,
    #[serde(rename = "clientSecret", default)]
    pub client_secret: String,
    #[serde(default)]
    pub oauth_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_retry_delay_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_api_base_url: Option<String>,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "App configuration settings failed to load: {:?} does not exist",
                path
            );
        }

        let config: AppConfig = confy::load_path(path)
            .with_context(|| format!("failed to parse configuration file {:?}", path))?;

        log::info!(
            "{} Loaded configuration from {:?}",
            global_constants::LOG_TAG_CONFIG,
            path
        );

        if config.client_id.is_empty() || config.client_secret.is_empty() {
            log::warn!(
                "{} clientId or clientSecret is empty, token exchange will fail",
                global_constants::LOG_TAG_CONFIG
            );
        }

        Ok(config)
    }
}

/// Immutable runtime settings, built once at startup and handed to every
/// component that needs them.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub bucket_name: String,
    pub project_id: String,
    pub coordinator_base_url: String,
    pub location_name: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub image_path: PathBuf,
    pub object_prefix: String,
    pub capture_command: String,
    pub capture_args: Vec<String>,
    pub visibility_attempts: u32,
    pub visibility_retry_delay: Duration,
    pub storage_api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_config(&AppConfig::default())
    }
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Self {
        let location_name = config
            .location_name
            .clone()
            .unwrap_or_else(|| global_constants::DEFAULT_LOCATION_NAME.to_string());

        let object_prefix = config.object_prefix.clone().unwrap_or_else(|| {
            default_object_prefix(global_constants::DEFAULT_OBJECT_PREFIX_ROOT, &location_name)
        });

        let capture_args = config.capture_args.clone().unwrap_or_else(|| {
            global_constants::DEFAULT_CAPTURE_ARGS
                .iter()
                .map(|arg| arg.to_string())
                .collect()
        });

        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            bucket_name: config
                .bucket_name
                .clone()
                .unwrap_or_else(|| global_constants::DEFAULT_BUCKET_NAME.to_string()),
            project_id: config
                .project_id
                .clone()
                .unwrap_or_else(|| global_constants::DEFAULT_PROJECT_ID.to_string()),
            coordinator_base_url: config
                .coordinator_base_url
                .clone()
                .unwrap_or_else(|| global_constants::DEFAULT_COORDINATOR_BASE_URL.to_string()),
            location_name,
            poll_interval: Duration::from_secs(
                config
                    .poll_interval_secs
                    .unwrap_or(global_constants::DEFAULT_POLL_INTERVAL_SECS),
            ),
            request_timeout: Duration::from_secs(
                config
                    .request_timeout_secs
                    .unwrap_or(global_constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            image_path: config
                .image_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(global_constants::DEFAULT_IMAGE_PATH)),
            object_prefix,
            capture_command: config
                .capture_command
                .clone()
                .unwrap_or_else(|| global_constants::DEFAULT_CAPTURE_COMMAND.to_string()),
            capture_args,
            visibility_attempts: config
                .visibility_attempts
                .unwrap_or(global_constants::DEFAULT_VISIBILITY_ATTEMPTS)
                .max(1),
            visibility_retry_delay: Duration::from_secs(
                config
                    .visibility_retry_delay_secs
                    .unwrap_or(global_constants::DEFAULT_VISIBILITY_RETRY_DELAY_SECS),
            ),
            storage_api_base_url: config
                .storage_api_base_url
                .clone()
                .unwrap_or_else(|| global_constants::STORAGE_API_BASE_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_match_reference_deployment() {
        let settings = Settings::default();

        assert_eq!(settings.bucket_name, "pipark2014");
        assert_eq!(settings.project_id, "pipark2014");
        assert_eq!(settings.location_name, "300ThirdStreet");
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert_eq!(settings.object_prefix, "parkingspots/imgs/300ThirdStreet/");
        assert_eq!(settings.capture_command, "raspistill");
        assert_eq!(
            settings.capture_args,
            vec!["-o", "test.jpg", "-w", "640", "-h", "480"]
        );
        assert_eq!(settings.image_path, PathBuf::from("./test.jpg"));
        assert_eq!(settings.visibility_attempts, 3);
    }

    #[test]
    fn test_object_prefix_follows_overridden_location() {
        let config = AppConfig {
            location_name: Some("MainStreetLot".to_string()),
            ..AppConfig::default()
        };

        let settings = Settings::from_config(&config);

        assert_eq!(settings.object_prefix, "parkingspots/imgs/MainStreetLot/");
    }

    #[test]
    fn test_visibility_attempts_is_at_least_one() {
        let config = AppConfig {
            visibility_attempts: Some(0),
            ..AppConfig::default()
        };

        assert_eq!(Settings::from_config(&config).visibility_attempts, 1);
    }

    #[test]
    fn test_load_reads_camel_case_client_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
clientId = "client-123.apps.googleusercontent.com"
clientSecret = "shh"
oauth_code = "4/abc"
poll_interval_secs = 30
capture_args = ["-o", "snap.jpg"]
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.client_id, "client-123.apps.googleusercontent.com");
        assert_eq!(config.client_secret, "shh");
        assert_eq!(config.oauth_code, "4/abc");
        assert_eq!(config.poll_interval_secs, Some(30));
        assert_eq!(
            config.capture_args,
            Some(vec!["-o".to_string(), "snap.jpg".to_string()])
        );
        assert!(config.bucket_name.is_none());
    }

    #[test]
    fn test_load_fails_when_file_is_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let result = AppConfig::load(&path);

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
