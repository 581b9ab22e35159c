//! Configuration System
//!
//! Layered configuration built on the `config` crate. Lowest to highest
//! precedence: built-in defaults, the global file, the workspace file
//! (`./treeclone.toml`), then `TREECLONE_*` environment variables. An
//! explicit `--config` file replaces both file layers. CLI flags are applied
//! on top by the binary.

use crate::auth::DEFAULT_TOKEN_URL;
use crate::drive::http::DEFAULT_API_BASE_URL;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;
mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreecloneConfig {
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the access token comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Raw bearer token; takes priority over everything else
    #[serde(default)]
    pub access_token: Option<String>,

    /// Authorized-user or service-account JSON file
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
}

/// Drive API endpoints, timeouts and default scoping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_oauth_token_url")]
    pub oauth_token_url: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size for listings (1..=1000)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub shared_drive: bool,

    #[serde(default)]
    pub source_drive_id: Option<String>,

    #[serde(default)]
    pub destination_drive_id: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_oauth_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_page_size() -> u32 {
    1000
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            oauth_token_url: default_oauth_token_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            shared_drive: false,
            source_drive_id: None,
            destination_drive_id: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    Drive(String),
    Credentials(String),
    Logging(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::Drive(msg) => write!(f, "Drive: {}", msg),
            ConfigValidationError::Credentials(msg) => write!(f, "Credentials: {}", msg),
            ConfigValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl DriveConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !is_http_url(&self.api_base_url) {
            return Err(format!("api_base_url '{}' is not an http(s) URL", self.api_base_url));
        }
        if !is_http_url(&self.oauth_token_url) {
            return Err(format!(
                "oauth_token_url '{}' is not an http(s) URL",
                self.oauth_token_url
            ));
        }
        if self.page_size == 0 || self.page_size > 1000 {
            return Err(format!("page_size must be between 1 and 1000, got {}", self.page_size));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl TreecloneConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.drive.validate() {
            errors.push(ConfigValidationError::Drive(e));
        }

        if let Some(path) = &self.credentials.credentials_file {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError::Credentials(
                    "credentials_file cannot be empty".to_string(),
                ));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ConfigValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render the effective configuration as TOML with secrets masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        if shown.credentials.access_token.is_some() {
            shown.credentials.access_token = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&shown)
    }
}

/// Builds a [`TreecloneConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load with the global and workspace files found from `workspace_root`.
    pub fn load(workspace_root: &Path) -> Result<TreecloneConfig, config::ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::environment::add_to_builder(builder);
        let config: TreecloneConfig = builder.build()?.try_deserialize()?;
        debug!(workspace_root = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load with `path` standing in for the global and workspace files.
    pub fn load_from_file(path: &Path) -> Result<TreecloneConfig, config::ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
        );
        let builder = sources::environment::add_to_builder(builder);
        let config: TreecloneConfig = builder.build()?.try_deserialize()?;
        debug!(config_file = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Pick between [`Self::load`] and [`Self::load_from_file`].
    pub fn resolve(
        workspace_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<TreecloneConfig, config::ConfigError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load(workspace_root),
        }
    }
}
