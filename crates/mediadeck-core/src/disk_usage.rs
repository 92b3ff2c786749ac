//! Disk usage of the filesystems holding the move targets.

use crate::error::Result;
use crate::models::DiskStats;
use std::path::PathBuf;
use sysinfo::Disks;

/// Produces usage figures for every mounted filesystem.
pub trait DiskProber: Send + Sync {
    fn probe(&self) -> Result<Vec<DiskStats>>;
}

/// [`DiskProber`] backed by `sysinfo`.
#[derive(Debug, Clone, Default)]
pub struct SysinfoDiskProber;

impl SysinfoDiskProber {
    pub fn new() -> Self {
        Self
    }
}

impl DiskProber for SysinfoDiskProber {
    fn probe(&self) -> Result<Vec<DiskStats>> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                DiskStats::new(
                    disk.mount_point().to_path_buf(),
                    disk.file_system().to_string_lossy().into_owned(),
                    disk.total_space(),
                    disk.available_space(),
                )
            })
            .collect())
    }
}

/// Keep the mounts that hold at least one of `targets`, sorted by mount path.
pub fn filter_to_targets(stats: Vec<DiskStats>, targets: &[PathBuf]) -> Vec<DiskStats> {
    let mut kept: Vec<DiskStats> = stats
        .into_iter()
        .filter(|s| targets.iter().any(|t| s.contains(t)))
        .collect();
    kept.sort_by(|a, b| a.mount_path.cmp(&b.mount_path));
    kept.dedup_by(|a, b| a.mount_path == b.mount_path);
    kept
}
