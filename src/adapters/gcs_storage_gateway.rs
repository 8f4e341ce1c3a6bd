use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::StorageError;
use crate::core::interfaces::adapters::{CredentialProvider, StorageGateway};
use crate::core::models::UploadedImage;
use crate::global_constants::{LOG_TAG_STORAGE, PUBLIC_READ_ENTITY, PUBLIC_READ_ROLE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    name: String,
    #[serde(default)]
    media_link: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketResource {
    name: String,
    #[serde(default)]
    self_link: String,
}

/// Cloud Storage JSON API client for the handful of calls the relay needs.
pub struct GcsStorageGateway {
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    base_url: String,
}

impl GcsStorageGateway {
    pub fn build(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build storage HTTP client")?;

        Ok(Self {
            client,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!(
            "{}/storage/v1/b/{}",
            self.base_url,
            urlencoding::encode(bucket)
        )
    }

    fn object_url(&self, bucket: &str, object_name: &str) -> String {
        format!(
            "{}/o/{}",
            self.bucket_url(bucket),
            urlencoding::encode(object_name)
        )
    }

    async fn authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, StorageError> {
        let token = self.credentials.bearer_token().await?;
        Ok(request.bearer_auth(token))
    }

    async fn ensure_success(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Api {
            operation,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StorageGateway for GcsStorageGateway {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        let request = self.authorized(self.client.get(self.bucket_url(bucket))).await?;
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::ensure_success("bucket get", response).await?;
        Ok(true)
    }

    async fn create_bucket(&self, project_id: &str, bucket: &str) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/b?project={}",
            self.base_url,
            urlencoding::encode(project_id)
        );
        let request = self
            .authorized(self.client.post(url).json(&json!({ "name": bucket })))
            .await?;
        let response = Self::ensure_success("bucket insert", request.send().await?).await?;

        let created: BucketResource = response.json().await?;
        log::info!(
            "{} Created bucket {} at location {}",
            LOG_TAG_STORAGE,
            created.name,
            created.self_link
        );
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadedImage, StorageError> {
        let url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.base_url,
            urlencoding::encode(bucket),
            urlencoding::encode(object_name)
        );
        let request = self
            .authorized(
                self.client
                    .post(url)
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(content),
            )
            .await?;
        let response = Self::ensure_success("object insert", request.send().await?).await?;

        let object: ObjectResource = response.json().await?;
        log::debug!(
            "{} Uploaded {} with media link {}",
            LOG_TAG_STORAGE,
            object.name,
            object.media_link
        );

        Ok(UploadedImage {
            object_name: object.name,
            media_url: object.media_link,
        })
    }

    async fn make_public(&self, bucket: &str, object_name: &str) -> Result<(), StorageError> {
        let url = format!("{}/acl", self.object_url(bucket, object_name));
        let acl = json!({
            "bucket": bucket,
            "object": object_name,
            "entity": PUBLIC_READ_ENTITY,
            "role": PUBLIC_READ_ROLE,
        });
        let request = self.authorized(self.client.post(url).json(&acl)).await?;
        let response = Self::ensure_success("object acl insert", request.send().await?).await?;

        let result = response.text().await.unwrap_or_default();
        log::debug!(
            "{} Result of inserting ACL for {}/{}: {}",
            LOG_TAG_STORAGE,
            bucket,
            object_name,
            result
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, object_name: &str) -> Result<(), StorageError> {
        let request = self
            .authorized(self.client.delete(self.object_url(bucket, object_name)))
            .await?;
        Self::ensure_success("object delete", request.send().await?).await?;

        log::info!("{} Deleted {}/{}", LOG_TAG_STORAGE, bucket, object_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::CredentialError;
    use mockito::{Matcher, Server};

    struct StaticCredentials;

    #[async_trait]
    impl CredentialProvider for StaticCredentials {
        async fn bearer_token(&self) -> Result<String, CredentialError> {
            Ok("test-token".to_string())
        }
    }

    struct MissingCredentials;

    #[async_trait]
    impl CredentialProvider for MissingCredentials {
        async fn bearer_token(&self) -> Result<String, CredentialError> {
            Err(CredentialError::NoRefreshToken)
        }
    }

    fn gateway_for(server: &Server) -> GcsStorageGateway {
        GcsStorageGateway::build(
            server.url(),
            Arc::new(StaticCredentials),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_object_url_encodes_path_like_names() {
        let gateway = GcsStorageGateway::build(
            "https://storage.example/",
            Arc::new(StaticCredentials),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = gateway.object_url("bucket", "imgs/lot/2014-03-01_09:15:30");

        assert_eq!(
            url,
            "https://storage.example/storage/v1/b/bucket/o/imgs%2Flot%2F2014-03-01_09%3A15%3A30"
        );
    }

    #[tokio::test]
    async fn test_bucket_exists_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/storage/v1/b/pipark")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(r#"{"name":"pipark"}"#)
            .create_async()
            .await;

        let exists = gateway_for(&server).bucket_exists("pipark").await.unwrap();

        assert!(exists);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bucket_exists_is_false_on_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/storage/v1/b/pipark")
            .with_status(404)
            .create_async()
            .await;

        let exists = gateway_for(&server).bucket_exists("pipark").await.unwrap();

        assert!(!exists);
    }

    #[tokio::test]
    async fn test_bucket_exists_surfaces_other_statuses() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/storage/v1/b/pipark")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let result = gateway_for(&server).bucket_exists("pipark").await;

        assert!(matches!(
            result,
            Err(StorageError::Api { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_create_bucket_posts_name_under_project() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/b")
            .match_query(Matcher::UrlEncoded("project".into(), "proj".into()))
            .match_body(Matcher::Json(json!({"name": "pipark"})))
            .with_status(200)
            .with_body(r#"{"name":"pipark","selfLink":"https://storage/b/pipark"}"#)
            .create_async()
            .await;

        gateway_for(&server)
            .create_bucket("proj", "pipark")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_object_returns_media_link() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/storage/v1/b/pipark/o")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("uploadType".into(), "media".into()),
                Matcher::UrlEncoded("name".into(), "imgs/lot/a b".into()),
            ]))
            .match_header("content-type", "image/jpeg")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                r#"{"name":"imgs/lot/a b","mediaLink":"https://storage/download/imgs%2Flot%2Fa%20b"}"#,
            )
            .create_async()
            .await;

        let image = gateway_for(&server)
            .upload_object("pipark", "imgs/lot/a b", vec![0xFF, 0xD8, 0xFF], "image/jpeg")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(image.object_name, "imgs/lot/a b");
        assert_eq!(
            image.media_url,
            "https://storage/download/imgs%2Flot%2Fa%20b"
        );
    }

    #[tokio::test]
    async fn test_make_public_grants_all_users_reader() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/b/pipark/o/imgs%2Fa/acl")
            .match_body(Matcher::PartialJson(
                json!({"entity": "allUsers", "role": "READER"}),
            ))
            .with_status(200)
            .with_body(r#"{"entity":"allUsers","role":"READER"}"#)
            .create_async()
            .await;

        gateway_for(&server)
            .make_public("pipark", "imgs/a")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_object_reports_api_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/storage/v1/b/pipark/o/imgs%2Fa")
            .with_status(500)
            .with_body("backend error")
            .create_async()
            .await;

        let result = gateway_for(&server).delete_object("pipark", "imgs/a").await;

        match result {
            Err(StorageError::Api {
                operation,
                status,
                body,
            }) => {
                assert_eq!(operation, "object delete");
                assert_eq!(status, 500);
                assert_eq!(body, "backend error");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_stop_the_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/storage/v1/b/pipark")
            .expect(0)
            .create_async()
            .await;
        let gateway = GcsStorageGateway::build(
            server.url(),
            Arc::new(MissingCredentials),
            Duration::from_secs(5),
        )
        .unwrap();

        let result = gateway.bucket_exists("pipark").await;

        assert!(matches!(result, Err(StorageError::Credential(_))));
        mock.assert_async().await;
    }
}
