use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};

use crate::{
    data_types::sync::{validate_sync_window, SyncRequest, MAX_DAYS_TO_SYNC},
    errors::{SyncError, SyncResult},
};

pub const SECRETS_FILE: &str = "secrets.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PelotonConfig {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GarminConfig {
    pub email: String,
    pub password: String,
    /// `customMakeModel` of the Garmin gear rides are assigned to.
    pub peloton_gear: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_num_days")]
    pub num_days: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            num_days: default_num_days(),
        }
    }
}

fn default_num_days() -> i64 {
    MAX_DAYS_TO_SYNC
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Configuration {
    pub peloton: PelotonConfig,
    pub garmin: GarminConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Configuration {
    pub fn default_file() -> SyncResult<PathBuf> {
        std::env::current_dir()
            .map(|dir| dir.join(SECRETS_FILE))
            .map_err(|e| SyncError::Configuration(format!("No working directory: {}", e)))
    }

    pub fn from_file(path: &Path) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Configuration(format!("Unable to open {}: {}", path.display(), e))
        })?;

        Configuration::parse(&content)
    }

    pub fn parse(content: &str) -> SyncResult<Self> {
        let config: Configuration = toml::from_str(content)
            .map_err(|e| SyncError::Configuration(format!("Unable to parse secrets: {}", e)))?;

        validate_sync_window(config.sync.num_days)?;
        Ok(config)
    }

    /// Same settings, as submitted to the sync endpoint.
    pub fn from_request(request: &SyncRequest) -> SyncResult<Self> {
        request.validate()?;

        Ok(Self {
            peloton: PelotonConfig {
                email: request.peloton_email.clone(),
                password: request.peloton_password.clone(),
            },
            garmin: GarminConfig {
                email: request.garmin_email.clone(),
                password: request.garmin_password.clone(),
                peloton_gear: request.garmin_peloton_gear_name.clone(),
            },
            sync: SyncConfig {
                num_days: request.num_days_to_sync,
            },
        })
    }

    pub fn render_example() -> String {
        let example = Configuration {
            peloton: PelotonConfig {
                email: "<email>".to_string(),
                password: "<password>".to_string(),
            },
            garmin: GarminConfig {
                email: "<email>".to_string(),
                password: "<password>".to_string(),
                peloton_gear: "<name of Peloton gear>".to_string(),
            },
            sync: SyncConfig::default(),
        };

        toml::to_string(&example).unwrap_or_default()
    }
}
