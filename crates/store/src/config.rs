//! Store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the file-backed stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the sheet file and counter file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Display name of the sheet, reported by the health check.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Directory holding dated backup snapshots.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_sheet_name() -> String {
    "快递扫码记录".to_string()
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("data/backups")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sheet_name: default_sheet_name(),
            backup_dir: default_backup_dir(),
        }
    }
}
