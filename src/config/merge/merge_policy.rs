//! Merge rules: defaults and override order.
//!
//! Later sources win key by key, so a file that sets only `drive.page_size`
//! keeps every other default.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("drive.api_base_url", crate::drive::http::DEFAULT_API_BASE_URL)?
        .set_default("drive.oauth_token_url", crate::auth::DEFAULT_TOKEN_URL)?
        .set_default("drive.page_size", 1000i64)?
        .set_default("drive.shared_drive", false)?
        .set_default("logging.enabled", true)?
        .set_default("logging.output", "stderr")
}
