//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mediadeck_core::{
    DiskProber, DiskStats, MediaDeckConfig, MediaDeckError, MoveServer, Result, TorrentClient,
    TorrentRecord, TorrentStatus,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory torrent client.
#[derive(Default)]
pub struct FakeTorrents {
    pub torrents: Mutex<Vec<TorrentRecord>>,
    pub removed: Mutex<Vec<String>>,
    pub started: Mutex<Vec<String>>,
    pub fail_list: AtomicBool,
    pub fail_remove: AtomicBool,
}

impl FakeTorrents {
    pub fn set(&self, torrents: Vec<TorrentRecord>) {
        *self.torrents.lock().unwrap() = torrents;
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl TorrentClient for FakeTorrents {
    async fn list_all(&self) -> Result<Vec<TorrentRecord>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(MediaDeckError::TorrentClient {
                message: "connection refused".into(),
            });
        }
        Ok(self.torrents.lock().unwrap().clone())
    }

    async fn remove(&self, torrents: &[TorrentRecord]) -> Result<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(MediaDeckError::TorrentClient {
                message: "torrent-remove failed".into(),
            });
        }
        let mut all = self.torrents.lock().unwrap();
        for t in torrents {
            all.retain(|existing| existing.id != t.id);
            self.removed.lock().unwrap().push(t.name.clone());
        }
        Ok(())
    }

    async fn start(&self, torrents: &[TorrentRecord]) -> Result<()> {
        let mut all = self.torrents.lock().unwrap();
        for t in torrents {
            if let Some(existing) = all.iter_mut().find(|e| e.id == t.id) {
                existing.status = TorrentStatus::Downloading;
            }
            self.started.lock().unwrap().push(t.name.clone());
        }
        Ok(())
    }
}

/// Disk prober with canned output.
pub struct FakeDisks(pub Vec<DiskStats>);

impl DiskProber for FakeDisks {
    fn probe(&self) -> Result<Vec<DiskStats>> {
        Ok(self.0.clone())
    }
}

pub fn torrent(id: i64, name: &str, percent_done: f64, status: TorrentStatus) -> TorrentRecord {
    TorrentRecord {
        id,
        name: name.to_string(),
        percent_done,
        status,
        done_date: if percent_done >= 1.0 { 1_700_000_000 } else { 0 },
        ..Default::default()
    }
}

/// A download directory, one movie target and one series root.
pub struct Env {
    pub dir: TempDir,
    pub torrents: Arc<FakeTorrents>,
}

impl Env {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["downloads", "movies", "series"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self {
            dir,
            torrents: Arc::new(FakeTorrents::default()),
        }
    }

    pub fn source(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }

    pub fn movies(&self) -> PathBuf {
        self.dir.path().join("movies")
    }

    pub fn series(&self) -> PathBuf {
        self.dir.path().join("series")
    }

    /// Create `name` as a directory in the download directory.
    pub fn download(&self, name: &str) -> PathBuf {
        let path = self.source().join(name);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("video.mkv"), b"data").unwrap();
        path
    }

    pub fn config(&self) -> MediaDeckConfig {
        MediaDeckConfig {
            source_dir: self.source(),
            movie_targets: vec![self.movies()],
            series_targets: vec![self.series()],
            ..Default::default()
        }
    }

    pub fn server(&self) -> MoveServer {
        self.server_with(self.config())
    }

    pub fn server_with(&self, config: MediaDeckConfig) -> MoveServer {
        let mount = self.dir.path().to_path_buf();
        MoveServer::builder(config)
            .with_torrent_client(self.torrents.clone())
            .with_disk_prober(Arc::new(FakeDisks(vec![
                DiskStats::new(mount, "ext4".into(), 1000, 250),
                DiskStats::new("/unrelated".into(), "tmpfs".into(), 10, 10),
            ])))
            .build()
            .unwrap()
    }
}
