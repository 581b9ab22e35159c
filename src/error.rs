//! Error types for folder tree replication.

use crate::types::FolderId;
use thiserror::Error;

/// Per-call failures from a drive backend
#[derive(Debug, Clone, Error)]
pub enum DriveError {
    #[error("Parameter not supported by this API generation: {0}")]
    UnsupportedParameter(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Request failed with status {status}: {message}")]
    Request { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl DriveError {
    /// Whether the failure is an authentication problem rather than a per-node one.
    pub fn is_auth(&self) -> bool {
        matches!(self, DriveError::Unauthorized(_))
    }
}

/// Credential loading and token exchange failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No credentials configured (set credentials.access_token, credentials.credentials_file or TREECLONE_ACCESS_TOKEN)")]
    MissingCredentials,

    #[error("Failed to read credentials file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Unsupported credentials file: {0}")]
    UnsupportedCredentials(String),

    #[error("Failed to sign service account assertion: {0}")]
    Signing(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Drive rejected the credentials: {0}")]
    Rejected(String),
}

/// Input validation failures surfaced before a run starts
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("{id} is not a folder (mime type {mime_type})")]
    NotAFolder { id: FolderId, mime_type: String },

    #[error("{0} is in the trash")]
    Trashed(FolderId),

    #[error("{id} is not accessible: {source}")]
    Inaccessible {
        id: FolderId,
        #[source]
        source: DriveError,
    },

    #[error("resume map belongs to destination {found}, not {expected}")]
    ResumeMismatch { expected: FolderId, found: FolderId },
}

/// Top-level error for replication runs and CLI commands
#[derive(Debug, Error)]
pub enum ReplicaError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Drive error: {0}")]
    Drive(#[from] DriveError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ReplicaError {
    fn from(err: config::ConfigError) -> Self {
        ReplicaError::Config(err.to_string())
    }
}
