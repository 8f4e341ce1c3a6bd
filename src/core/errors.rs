use std::path::PathBuf;

use thiserror::Error;

/// Whether a failure ends the process or only the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Transient,
    Fatal,
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("failed to reach coordinator at {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("coordinator at {url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("coordinator response from {url} is not a valid poll signal: {source}")]
    Protocol {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CoordinatorError {
    pub fn class(&self) -> FailureClass {
        match self {
            CoordinatorError::Network { .. } | CoordinatorError::Status { .. } => {
                FailureClass::Transient
            }
            CoordinatorError::Protocol { .. } => FailureClass::Fatal,
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no cached token and no authorization code available")]
    AuthorizationRequired,
    #[error("token cache {path:?} could not be read: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token cache {path:?} is malformed: {source}")]
    CacheFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("token cache {path:?} could not be written: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("cached token has expired and carries no refresh token")]
    NoRefreshToken,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage API returned {status} for {operation}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to start capture command {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("capture command {command:?} with args {args:?} exited with {status}")]
    ExitStatus {
        command: String,
        args: Vec<String>,
        status: std::process::ExitStatus,
    },
    #[error("no captured image at {0:?}")]
    MissingImage(PathBuf),
}

/// Everything that can abort one poll-capture-upload-notify cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("poll failed: {0}")]
    Poll(#[source] CoordinatorError),
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("failed to read captured image {path:?}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload of {object_name} failed: {source}")]
    Upload {
        object_name: String,
        #[source]
        source: StorageError,
    },
    #[error("could not make {object_name} public after {attempts} attempts: {source}")]
    Visibility {
        object_name: String,
        attempts: u32,
        #[source]
        source: StorageError,
    },
}

impl CycleError {
    pub fn class(&self) -> FailureClass {
        match self {
            CycleError::Poll(error) => error.class(),
            CycleError::Capture(_)
            | CycleError::ReadImage { .. }
            | CycleError::Upload { .. }
            | CycleError::Visibility { .. } => FailureClass::Fatal,
        }
    }
}
