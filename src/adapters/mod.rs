mod gcs_storage_gateway;
mod google_oauth_credentials;
mod http_coordinator_client;

pub use gcs_storage_gateway::GcsStorageGateway;
pub use google_oauth_credentials::{GoogleOAuthCredentials, OAuthClientConfig};
pub use http_coordinator_client::HttpCoordinatorClient;
