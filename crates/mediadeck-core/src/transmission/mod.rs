//! Torrent client access.

mod client;

pub use client::TransmissionClient;

use crate::error::Result;
use crate::models::TorrentRecord;
use async_trait::async_trait;

/// The operations the reconciler and the assistant need from a torrent
/// client.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Every torrent the client knows about.
    async fn list_all(&self) -> Result<Vec<TorrentRecord>>;

    /// Drop `torrents` from the client, keeping the downloaded data.
    async fn remove(&self, torrents: &[TorrentRecord]) -> Result<()>;

    /// Resume `torrents`.
    async fn start(&self, torrents: &[TorrentRecord]) -> Result<()>;
}
