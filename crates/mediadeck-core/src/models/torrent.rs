//! Torrent client records.

use serde::{Deserialize, Serialize};

/// Transmission torrent status.
///
/// Serialized as Transmission's numeric code (0 stopped through 6 seeding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TorrentStatus {
    #[default]
    Stopped,
    QueuedCheck,
    Checking,
    QueuedDownload,
    Downloading,
    QueuedSeed,
    Seeding,
}

impl TorrentStatus {
    /// Stopped torrents are what the rest of the system calls "paused".
    pub fn is_paused(self) -> bool {
        self == TorrentStatus::Stopped
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TorrentStatus::Stopped => "stopped",
            TorrentStatus::QueuedCheck => "queued_check",
            TorrentStatus::Checking => "checking",
            TorrentStatus::QueuedDownload => "queued_download",
            TorrentStatus::Downloading => "downloading",
            TorrentStatus::QueuedSeed => "queued_seed",
            TorrentStatus::Seeding => "seeding",
        }
    }
}

impl TryFrom<u8> for TorrentStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => TorrentStatus::Stopped,
            1 => TorrentStatus::QueuedCheck,
            2 => TorrentStatus::Checking,
            3 => TorrentStatus::QueuedDownload,
            4 => TorrentStatus::Downloading,
            5 => TorrentStatus::QueuedSeed,
            6 => TorrentStatus::Seeding,
            other => return Err(format!("unknown torrent status {other}")),
        })
    }
}

impl From<TorrentStatus> for u8 {
    fn from(status: TorrentStatus) -> Self {
        status as u8
    }
}

impl std::fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One torrent as reported by the client.
///
/// Field names follow the Transmission `torrent-get` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TorrentRecord {
    pub id: i64,
    pub name: String,
    /// Completion fraction in `0.0..=1.0`.
    pub percent_done: f64,
    pub status: TorrentStatus,
    /// Unix seconds, 0 if unknown.
    pub added_date: i64,
    /// Unix seconds, 0 while still downloading.
    pub done_date: i64,
    pub download_dir: String,
    pub is_finished: bool,
    pub error: i64,
    pub error_string: String,
    pub magnet_link: String,
}

impl TorrentRecord {
    /// Whether every byte has been downloaded.
    pub fn is_downloaded(&self) -> bool {
        self.percent_done >= 1.0
    }

    pub fn is_paused(&self) -> bool {
        self.status.is_paused()
    }
}
