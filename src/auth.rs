//! Credential resolution and OAuth token exchange
//!
//! Three credential sources are supported, checked in this order:
//! 1. A raw access token (`credentials.access_token` or `TREECLONE_ACCESS_TOKEN`)
//! 2. An authorized-user JSON file (client id, secret and refresh token)
//! 3. A service-account JSON file, exchanged through a signed RS256 assertion

use crate::config::{CredentialsConfig, DriveConfig};
use crate::drive::http::build_http_client;
use crate::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const ACCESS_TOKEN_ENV: &str = "TREECLONE_ACCESS_TOKEN";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Bearer token for drive calls. Never printed.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Contents of a credentials file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsFile {
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
}

impl CredentialsFile {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|e| AuthError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        serde_json::from_str(raw).map_err(|e| AuthError::UnsupportedCredentials(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Sign the JWT a service account trades for an access token.
pub fn build_assertion(
    client_email: &str,
    private_key: &str,
    token_uri: &str,
    issued_at: i64,
) -> Result<String, AuthError> {
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| AuthError::Signing(e.to_string()))?;
    let claims = AssertionClaims {
        iss: client_email,
        scope: DRIVE_SCOPE,
        aud: token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };
    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| AuthError::Signing(e.to_string()))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

async fn exchange(
    drive: &DriveConfig,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<AccessToken, AuthError> {
    let client = build_http_client(drive).map_err(|e| AuthError::TokenExchange(e.to_string()))?;
    let response = client
        .post(token_uri)
        .form(form)
        .send()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AuthError::TokenExchange(format!("status {} - {}", status, body)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AuthError::TokenExchange(format!("Failed to parse token response: {}", e)))?;
    Ok(AccessToken::new(token.access_token))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve credentials into an access token.
pub async fn authenticate(
    credentials: &CredentialsConfig,
    drive: &DriveConfig,
) -> Result<AccessToken, AuthError> {
    if let Some(token) = non_empty(credentials.access_token.as_deref()) {
        debug!("Using configured access token");
        return Ok(AccessToken::new(token));
    }
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.trim().is_empty() {
            debug!("Using access token from {}", ACCESS_TOKEN_ENV);
            return Ok(AccessToken::new(token.trim()));
        }
    }

    let path = credentials
        .credentials_file
        .as_deref()
        .ok_or(AuthError::MissingCredentials)?;

    match CredentialsFile::load(path)? {
        CredentialsFile::AuthorizedUser {
            client_id,
            client_secret,
            refresh_token,
            token_uri,
        } => {
            let token_uri = token_uri.unwrap_or_else(|| drive.oauth_token_url.clone());
            info!(token_uri = %token_uri, "Refreshing authorized user token");
            exchange(
                drive,
                &token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("client_id", &client_id),
                    ("client_secret", &client_secret),
                    ("refresh_token", &refresh_token),
                ],
            )
            .await
        }
        CredentialsFile::ServiceAccount {
            client_email,
            private_key,
            token_uri,
        } => {
            let token_uri = token_uri.unwrap_or_else(|| drive.oauth_token_url.clone());
            info!(account = %client_email, "Exchanging service account assertion");
            let assertion =
                build_assertion(&client_email, &private_key, &token_uri, Utc::now().timestamp())?;
            exchange(
                drive,
                &token_uri,
                &[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", &assertion),
                ],
            )
            .await
        }
    }
}
