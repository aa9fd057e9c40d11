//! File storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local filesystem layout. Uploaded bytes live under
/// `{data_root}/{uploads_dir}/{user_id}/{group_id}/{file_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Sub-directory of `data_root` holding uploaded files.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

impl StorageConfig {
    /// Directory handed to the storage provider as its root.
    pub fn uploads_root(&self) -> PathBuf {
        PathBuf::from(&self.data_root).join(&self.uploads_dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}
