//! Disk usage of mounted filesystems.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Usage of one mounted filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskStats {
    pub mount_path: PathBuf,
    pub filesystem: String,
    pub size_bytes: u64,
    pub used_bytes: u64,
    pub avail_bytes: u64,
    pub percent_full: f32,
}

impl DiskStats {
    pub fn new(mount_path: PathBuf, filesystem: String, size_bytes: u64, avail_bytes: u64) -> Self {
        let used_bytes = size_bytes.saturating_sub(avail_bytes);
        let percent_full = if size_bytes > 0 {
            (used_bytes as f64 / size_bytes as f64 * 100.0) as f32
        } else {
            0.0
        };
        Self {
            mount_path,
            filesystem,
            size_bytes,
            used_bytes,
            avail_bytes,
            percent_full,
        }
    }

    /// Whether this mount holds `path` (component-wise prefix).
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.mount_path)
    }
}
