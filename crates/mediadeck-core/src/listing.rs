//! Directory enumeration.

use crate::error::{MediaDeckError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates entries below a root directory.
pub trait DirectoryLister: Send + Sync {
    /// Entries at depth `1..=depth` below `root`, sorted, root excluded.
    fn list(&self, root: &Path, depth: usize, dirs_only: bool) -> Result<Vec<PathBuf>>;
}

/// [`DirectoryLister`] backed by `walkdir`.
#[derive(Debug, Clone, Default)]
pub struct WalkDirLister;

impl WalkDirLister {
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryLister for WalkDirLister {
    fn list(&self, root: &Path, depth: usize, dirs_only: bool) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(MediaDeckError::Listing {
                root: root.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).max_depth(depth) {
            let entry = entry.map_err(|e| MediaDeckError::Listing {
                root: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if dirs_only && !entry.file_type().is_dir() {
                continue;
            }
            entries.push(entry.into_path());
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Show A/Season 1/extras")).unwrap();
        std::fs::create_dir_all(dir.path().join("Show B")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join("Show B/cover.jpg"), b"").unwrap();
        dir
    }

    #[test]
    fn test_one_level_includes_files() {
        let dir = tree();
        let entries = WalkDirLister::new().list(dir.path(), 1, false).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Show A", "Show B", "notes.txt"]);
    }

    #[test]
    fn test_two_levels_dirs_only() {
        let dir = tree();
        let entries = WalkDirLister::new().list(dir.path(), 2, true).unwrap();
        assert_eq!(
            entries,
            vec![
                dir.path().join("Show A"),
                dir.path().join("Show A/Season 1"),
                dir.path().join("Show B"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let err = WalkDirLister::new()
            .list(&dir.path().join("nope"), 1, false)
            .unwrap_err();
        assert!(matches!(err, MediaDeckError::Listing { .. }));
    }
}
