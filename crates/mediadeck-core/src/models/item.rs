//! Items tracked by the registry.

use super::TorrentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Move state embedded in every item.
///
/// `Idle -> Moving -> Idle`. A finished move either removes the item from
/// the live registry (success) or leaves `last_error` set (failure).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveInfo {
    pub moving: bool,
    /// Concrete destination path of the move in flight.
    pub target: Option<PathBuf>,
    pub last_error: Option<String>,
    pub last_error_output: String,
}

/// One named entry from the download directory, the torrent client, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Registry key: on-disk basename or the torrent's name.
    pub name: String,
    /// Absolute path, `None` when only the torrent client knows the item.
    pub path: Option<PathBuf>,
    pub torrent: Option<TorrentRecord>,
    pub allow_move: bool,
    pub allow_assistant: bool,
    pub move_to: Option<PathBuf>,
    pub move_info: MoveInfo,
}

impl Item {
    /// Item discovered by the directory listing.
    pub fn from_disk(path: PathBuf, default_target: Option<PathBuf>) -> Self {
        let name = basename(&path);
        Self {
            name,
            path: Some(path),
            torrent: None,
            allow_move: false,
            allow_assistant: true,
            move_to: default_target,
            move_info: MoveInfo::default(),
        }
    }

    /// Item known only to the torrent client.
    pub fn from_torrent(torrent: TorrentRecord, default_target: Option<PathBuf>) -> Self {
        Self {
            name: torrent.name.clone(),
            path: None,
            torrent: Some(torrent),
            allow_move: false,
            allow_assistant: true,
            move_to: default_target,
            move_info: MoveInfo::default(),
        }
    }

    /// Movable when on disk, not moving, and not an unfinished download.
    pub fn compute_allow_move(&self) -> bool {
        self.path.is_some()
            && !self.move_info.moving
            && self.torrent.as_ref().map_or(true, TorrentRecord::is_downloaded)
    }

    pub fn refresh_allow_move(&mut self) {
        self.allow_move = self.compute_allow_move();
    }

    /// Copy the fields a user or a previous move set onto this rebuilt item.
    pub fn carry_over(&mut self, previous: &Item) {
        self.allow_assistant = previous.allow_assistant;
        self.allow_move = previous.allow_move;
        self.move_info = previous.move_info.clone();
        self.move_to = previous.move_to.clone();
    }
}

/// An item that left the live registry after a successful move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub item: Item,
    pub moved_to: Option<PathBuf>,
    pub moved_at: DateTime<Utc>,
}

/// An item that vanished from the listings without being moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisappearedEntry {
    pub item: Item,
    pub noticed_at: DateTime<Utc>,
}

/// Final path component as a string, or the whole path if there is none.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
