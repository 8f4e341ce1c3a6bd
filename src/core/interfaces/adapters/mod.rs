mod coordinator_client;
mod credential_provider;
mod storage_gateway;

pub use coordinator_client::CoordinatorClient;
pub use credential_provider::CredentialProvider;
pub use storage_gateway::StorageGateway;
