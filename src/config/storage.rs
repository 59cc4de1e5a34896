//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where sessions, transcripts and exported documents live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root data directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Directory for session and transcript values.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Directory for exported agreements.
    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdirectories_hang_off_data_dir() {
        let config = StorageConfig {
            data_dir: PathBuf::from("/var/lib/discovery"),
        };
        assert_eq!(config.store_dir(), PathBuf::from("/var/lib/discovery/store"));
        assert_eq!(config.export_dir(), PathBuf::from("/var/lib/discovery/exports"));
    }

    #[test]
    fn empty_data_dir_is_invalid() {
        let config = StorageConfig {
            data_dir: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }
}
