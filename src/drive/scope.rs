//! Shared-drive scope flags and their two API parameter generations

use serde::{Deserialize, Serialize};

/// Which generation of shared-drive query parameters to send.
///
/// `Current` uses the all-drives names; `Legacy` uses the team-drive names
/// older API deployments still expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiGeneration {
    #[default]
    Current,
    Legacy,
}

impl ApiGeneration {
    /// Generation to retry with when this one's parameters are rejected
    pub fn fallback(self) -> Option<Self> {
        match self {
            ApiGeneration::Current => Some(ApiGeneration::Legacy),
            ApiGeneration::Legacy => None,
        }
    }

    pub fn supports_param(self) -> &'static str {
        match self {
            ApiGeneration::Current => "supportsAllDrives",
            ApiGeneration::Legacy => "supportsTeamDrives",
        }
    }

    pub fn include_items_param(self) -> &'static str {
        match self {
            ApiGeneration::Current => "includeItemsFromAllDrives",
            ApiGeneration::Legacy => "includeTeamDriveItems",
        }
    }

    pub fn drive_id_param(self) -> &'static str {
        match self {
            ApiGeneration::Current => "driveId",
            ApiGeneration::Legacy => "teamDriveId",
        }
    }

    fn drive_corpus(self) -> &'static str {
        match self {
            ApiGeneration::Current => "drive",
            ApiGeneration::Legacy => "teamDrive",
        }
    }

    fn all_drives_corpus(self) -> &'static str {
        match self {
            ApiGeneration::Current => "allDrives",
            ApiGeneration::Legacy => "user,allTeamDrives",
        }
    }

    /// `fields` selector for single-item metadata requests
    pub fn metadata_fields(self) -> String {
        format!("id,name,mimeType,trashed,{}", self.drive_id_param())
    }
}

/// Scope flags attached to every remote call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveScope {
    /// Request visibility of shared-drive items
    pub shared: bool,
    /// Restrict listings to this shared drive's corpus
    pub drive_id: Option<String>,
    pub generation: ApiGeneration,
}

impl DriveScope {
    /// Scope for items in the account's own drive
    pub fn my_drive() -> Self {
        Self::default()
    }

    pub fn shared(drive_id: Option<String>) -> Self {
        Self {
            shared: true,
            drive_id,
            generation: ApiGeneration::Current,
        }
    }

    pub fn with_generation(&self, generation: ApiGeneration) -> Self {
        Self {
            generation,
            ..self.clone()
        }
    }

    pub fn with_drive_id(&self, drive_id: Option<String>) -> Self {
        Self {
            drive_id,
            ..self.clone()
        }
    }

    /// Query parameters for get and create requests
    pub fn item_params(&self) -> Vec<(&'static str, String)> {
        if !self.shared {
            return Vec::new();
        }
        vec![(self.generation.supports_param(), "true".to_string())]
    }

    /// Query parameters for listing requests
    pub fn list_params(&self) -> Vec<(&'static str, String)> {
        if !self.shared {
            return Vec::new();
        }
        let generation = self.generation;
        let mut params = vec![
            (generation.supports_param(), "true".to_string()),
            (generation.include_items_param(), "true".to_string()),
        ];
        match self.drive_id.as_deref().filter(|id| !id.is_empty()) {
            Some(drive_id) => {
                params.push(("corpora", generation.drive_corpus().to_string()));
                params.push((generation.drive_id_param(), drive_id.to_string()));
            }
            None => params.push(("corpora", generation.all_drives_corpus().to_string())),
        }
        params
    }
}
