//! Google Drive v3 client over reqwest

use crate::auth::AccessToken;
use crate::config::DriveConfig;
use crate::drive::{ChildFolder, DriveClient, DriveScope, FolderMetadata, SharedDrive};
use crate::error::{DriveError, ReplicaError};
use crate::types::{FolderId, FOLDER_MIME_TYPE};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];
const PARAMETER_REASONS: &[&str] = &["invalidParameter", "unknownParameter"];

/// Drive API client authenticated with a bearer token
pub struct GoogleDriveClient {
    client: Client,
    base_url: Url,
    token: AccessToken,
    page_size: u32,
}

impl GoogleDriveClient {
    pub fn new(token: AccessToken, config: &DriveConfig) -> Result<Self, ReplicaError> {
        let client = build_http_client(config)?;
        let base_url = Url::parse(config.api_base_url.trim_end_matches('/')).map_err(|e| {
            ReplicaError::Config(format!(
                "Invalid API base URL {}: {}",
                config.api_base_url, e
            ))
        })?;
        Ok(Self {
            client,
            base_url,
            token,
            page_size: config.page_size,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DriveError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DriveError::Transport(format!("Cannot build a path on {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DriveError> {
        let response = request
            .bearer_auth(self.token.secret())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_error(status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DriveError::Decode(e.to_string()))
    }
}

pub(crate) fn build_http_client(config: &DriveConfig) -> Result<Client, ReplicaError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ReplicaError::Config(format!("Failed to create HTTP client: {}", e)))
}

fn map_transport_error(error: reqwest::Error) -> DriveError {
    if error.is_timeout() {
        DriveError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        DriveError::Transport(format!("Connection error: {}", error))
    } else {
        DriveError::Transport(format!("HTTP error: {}", error))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    location_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Map a non-success response to a typed drive error.
pub(crate) fn classify_error(status: u16, body: &str) -> DriveError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = if envelope.error.message.is_empty() {
        body.trim().to_string()
    } else {
        envelope.error.message.clone()
    };
    let has_reason = |reasons: &[&str]| {
        envelope
            .error
            .errors
            .iter()
            .any(|d| reasons.contains(&d.reason.as_str()))
    };

    match status {
        400 => {
            let parameter = envelope.error.errors.iter().find(|d| {
                PARAMETER_REASONS.contains(&d.reason.as_str())
                    || d.location_type.as_deref() == Some("parameter")
            });
            match parameter {
                Some(detail) => DriveError::UnsupportedParameter(
                    detail.location.clone().unwrap_or_else(|| message.clone()),
                ),
                None => DriveError::Request { status, message },
            }
        }
        401 => DriveError::Unauthorized(message),
        403 if has_reason(RATE_LIMIT_REASONS) => DriveError::RateLimited(message),
        403 => DriveError::PermissionDenied(message),
        404 => DriveError::NotFound(message),
        429 => DriveError::RateLimited(message),
        _ => DriveError::Request { status, message },
    }
}

/// Quote a value for use inside a drive search expression.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub(crate) fn child_folder_query(parent: &FolderId) -> String {
    format!(
        "'{}' in parents and mimeType = '{}' and trashed = false",
        escape_query_value(parent.as_str()),
        FOLDER_MIME_TYPE
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    files: Vec<ListedFile>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedFile {
    id: FolderId,
    name: String,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveListPage {
    #[serde(default)]
    drives: Vec<SharedDrive>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct CreatedFile {
    id: FolderId,
}

#[async_trait]
impl DriveClient for GoogleDriveClient {
    async fn get_metadata(
        &self,
        id: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderMetadata, DriveError> {
        let url = self.endpoint(&["files", id.as_str()])?;
        let mut query = scope.item_params();
        query.push(("fields", scope.generation.metadata_fields()));
        debug!(folder_id = %id, ?scope, "Fetching metadata");
        self.send(self.client.get(url).query(&query)).await
    }

    async fn list_child_folders(
        &self,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<Vec<ChildFolder>, DriveError> {
        let url = self.endpoint(&["files"])?;
        let mut children = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = scope.list_params();
            query.push(("q", child_folder_query(parent)));
            query.push(("fields", "nextPageToken, files(id, name, mimeType)".to_string()));
            query.push(("pageSize", self.page_size.to_string()));
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: FileListPage = self.send(self.client.get(url.clone()).query(&query)).await?;
            children.extend(
                page.files
                    .into_iter()
                    .filter(|f| f.mime_type.as_deref().map_or(true, |m| m == FOLDER_MIME_TYPE))
                    .map(|f| ChildFolder {
                        id: f.id,
                        name: f.name,
                    }),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(parent = %parent, count = children.len(), "Listed child folders");
        Ok(children)
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderId, DriveError> {
        let url = self.endpoint(&["files"])?;
        let mut query = scope.item_params();
        query.push(("fields", "id".to_string()));
        let body = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent],
        });
        let created: CreatedFile = self
            .send(self.client.post(url).query(&query).json(&body))
            .await?;
        Ok(created.id)
    }

    async fn list_shared_drives(&self) -> Result<Vec<SharedDrive>, DriveError> {
        let url = self.endpoint(&["drives"])?;
        let mut drives = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("pageSize", "100".to_string()),
                ("fields", "nextPageToken, drives(id, name)".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            let page: DriveListPage = self.send(self.client.get(url.clone()).query(&query)).await?;
            drives.extend(page.drives);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(drives)
    }

    fn backend_name(&self) -> &str {
        "google-drive"
    }
}
