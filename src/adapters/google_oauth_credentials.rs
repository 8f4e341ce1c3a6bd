use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::errors::CredentialError;
use crate::core::interfaces::adapters::CredentialProvider;
use crate::global_constants::{
    LOG_TAG_OAUTH, OAUTH_AUTH_URL, OAUTH_EXPIRY_SKEW_SECS, OAUTH_REDIRECT_URL,
    OAUTH_STORAGE_SCOPE, OAUTH_TOKEN_URL,
};

/// Installed-application OAuth client registration.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_url: String,
    pub scope: String,
}

impl OAuthClientConfig {
    pub fn google(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: OAUTH_AUTH_URL.to_string(),
            token_url: OAUTH_TOKEN_URL.to_string(),
            redirect_url: OAUTH_REDIRECT_URL.to_string(),
            scope: OAUTH_STORAGE_SCOPE.to_string(),
        }
    }

    /// URL the operator visits once to obtain an authorization code.
    pub fn auth_code_url(&self) -> String {
        format!(
            "{}?access_type=offline&client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(&self.scope)
        )
    }
}

/// Token material persisted in the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// A token without an expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - chrono::Duration::seconds(OAUTH_EXPIRY_SKEW_SECS) <= now,
            None => false,
        }
    }

    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| CredentialError::CacheRead {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_str(&contents).map_err(|source| CredentialError::CacheFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), CredentialError> {
        let contents =
            serde_json::to_string_pretty(self).map_err(|source| CredentialError::CacheFormat {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CredentialError::CacheWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, contents).map_err(|source| CredentialError::CacheWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_cached(self, previous_refresh_token: Option<String>) -> CachedToken {
        CachedToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh_token),
            token_type: self.token_type,
            expiry: self
                .expires_in
                .map(|seconds| Utc::now() + chrono::Duration::seconds(seconds)),
        }
    }
}

pub struct GoogleOAuthCredentials {
    client: reqwest::Client,
    config: OAuthClientConfig,
    cache_path: PathBuf,
    token: Mutex<CachedToken>,
}

impl GoogleOAuthCredentials {
    /// Restores the token from `cache_path`, or exchanges `authorization_code`
    /// for a new one and caches it.
    pub async fn authorize(
        config: OAuthClientConfig,
        cache_path: impl Into<PathBuf>,
        authorization_code: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, CredentialError> {
        let cache_path = cache_path.into();
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        let token = match CachedToken::load(&cache_path) {
            Ok(token) => {
                log::info!("{} Using cached token from {:?}", LOG_TAG_OAUTH, cache_path);
                token
            }
            Err(error) => {
                log::info!("{} No usable cached token: {}", LOG_TAG_OAUTH, error);

                let code = authorization_code
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .ok_or(CredentialError::AuthorizationRequired)?;

                let token = Self::exchange_code(&client, &config, code).await?;
                token.save(&cache_path)?;
                log::info!("{} Token is cached in {:?}", LOG_TAG_OAUTH, cache_path);
                token
            }
        };

        Ok(Self {
            client,
            config,
            cache_path,
            token: Mutex::new(token),
        })
    }

    async fn exchange_code(
        client: &reqwest::Client,
        config: &OAuthClientConfig,
        code: &str,
    ) -> Result<CachedToken, CredentialError> {
        log::info!("{} Exchanging authorization code for a token", LOG_TAG_OAUTH);

        let response = Self::request_token(
            client,
            &config.token_url,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &config.client_id),
                ("client_secret", &config.client_secret),
                ("redirect_uri", &config.redirect_url),
            ],
        )
        .await?;

        Ok(response.into_cached(None))
    }

    async fn refresh(&self, current: &CachedToken) -> Result<CachedToken, CredentialError> {
        let refresh_token = current
            .refresh_token
            .as_deref()
            .ok_or(CredentialError::NoRefreshToken)?;

        log::info!("{} Access token expired, refreshing", LOG_TAG_OAUTH);

        let response = Self::request_token(
            &self.client,
            &self.config.token_url,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
            ],
        )
        .await?;

        Ok(response.into_cached(current.refresh_token.clone()))
    }

    async fn request_token(
        client: &reqwest::Client,
        token_url: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, CredentialError> {
        let response = client.post(token_url).form(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}

#[async_trait]
impl CredentialProvider for GoogleOAuthCredentials {
    async fn bearer_token(&self) -> Result<String, CredentialError> {
        let mut token = self.token.lock().await;

        if token.is_expired_at(Utc::now()) {
            let refreshed = self.refresh(&token).await?;
            refreshed.save(&self.cache_path)?;
            *token = refreshed;
        }

        Ok(token.access_token.clone())
    }
}
