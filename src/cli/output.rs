//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{AuthError, ReplicaError, ValidationError};

/// Exit status when a run finished but left folders behind under `--strict`.
pub const EXIT_INCOMPLETE: i32 = 2;

/// Exit status for fatal errors.
pub const EXIT_FAILURE: i32 = 1;

/// Map domain errors to a string for CLI output, with a hint where one helps.
pub fn map_error(e: &ReplicaError) -> String {
    let hint = match e {
        ReplicaError::Auth(AuthError::MissingCredentials) => {
            Some("set TREECLONE_ACCESS_TOKEN or credentials.credentials_file in treeclone.toml")
        }
        ReplicaError::Auth(AuthError::Rejected(_)) => {
            Some("the access token may have expired; refresh it and retry")
        }
        ReplicaError::Validation(ValidationError::Inaccessible { .. }) => {
            Some("for folders in a shared drive, pass --shared-drive")
        }
        ReplicaError::Validation(ValidationError::ResumeMismatch { .. }) => {
            Some("--resume takes the id map written for this same destination")
        }
        _ => None,
    };
    match hint {
        Some(hint) => format!("Error: {}\nHint: {}", e, hint),
        None => format!("Error: {}", e),
    }
}
