//! MediaDeck Core - download reconciliation and move orchestration for a
//! home media box.
//!
//! The crate merges three unreliable sources (the download directory, the
//! torrent client and the series target roots) into one registry of items,
//! and serializes physical moves of finished downloads through a bounded
//! worker pool. An optional assistant starts and moves torrents on its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediadeck_core::{MediaDeckConfig, MoveServer};
//!
//! #[tokio::main]
//! async fn main() -> mediadeck_core::Result<()> {
//!     let config = MediaDeckConfig::load("mediadeck.json".as_ref())?;
//!     let server = MoveServer::builder(config).build()?;
//!     server.start().await?;
//!
//!     for item in server.items().await {
//!         println!("{} movable={}", item.name, item.allow_move);
//!     }
//!     server.move_item("Some.Movie.2020").await?;
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod config;
pub mod cron;
pub mod disk_usage;
pub mod error;
pub mod listing;
pub mod messages;
pub mod models;
pub mod moves;
pub mod registry;
pub mod transmission;

mod api;

// Re-export commonly used types
pub use assistant::{
    Assistant, AssistantDecision, AssistantItemStatus, AssistantStatus, TickSummary,
};
pub use config::{AssistantSettings, MediaDeckConfig, TransmissionSettings};
pub use cron::{CronJob, CronJobStatus, RunInfo};
pub use disk_usage::{DiskProber, SysinfoDiskProber};
pub use error::{MediaDeckError, MoveRejection, Result};
pub use listing::{DirectoryLister, WalkDirLister};
pub use messages::{LogMessage, MessageLog};
pub use models::{
    DisappearedEntry, DiskStats, HistoryEntry, Item, MoveInfo, TorrentRecord, TorrentStatus,
};
pub use moves::{MoveOutcome, MoveQueue, MoveRequest, Mover, QueueDepth, ShellMover};
pub use registry::{Listings, MoveTargets, ReconcileSummary, Registry};
pub use transmission::{TorrentClient, TransmissionClient};

pub use api::MoveServerBuilder;

use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use api::{weak_job, Shared};
use config::RefreshConfig;
use moves::{spawn_workers, MoveReceiver};

/// Main entry point: owns the registry, the move pipeline and the
/// background jobs.
///
/// Built with [`MoveServer::builder`]; nothing runs in the background until
/// [`MoveServer::start`].
pub struct MoveServer {
    shared: Arc<Shared>,
    assistant: Assistant,
    runtime: Mutex<Runtime>,
}

/// Worker state, present once started.
struct Runtime {
    receiver: Option<MoveReceiver>,
    workers: Vec<JoinHandle<()>>,
}

impl MoveServer {
    /// Create a builder for MoveServer.
    pub fn builder(config: MediaDeckConfig) -> MoveServerBuilder {
        MoveServerBuilder::new(config)
    }

    pub fn config(&self) -> &MediaDeckConfig {
        &self.shared.config
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Start the move workers and the background jobs, then run the first
    /// refresh and disk probe.
    ///
    /// Calling this again is a no-op.
    pub async fn start(&self) -> Result<()> {
        {
            let mut runtime = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(receiver) = runtime.receiver.take() else {
                debug!("MoveServer already started");
                return Ok(());
            };
            runtime.workers = spawn_workers(
                self.shared.config.move_workers,
                receiver,
                self.shared.mover.clone(),
                self.shared.registry.clone(),
                self.shared.messages.clone(),
            );
        }

        let refresh = self.shared.cron.register(
            RefreshConfig::REFRESH_JOB_NAME,
            self.shared.config.refresh_interval(),
            true,
            weak_job(&self.shared, |shared| async move {
                shared.refresh().await.map(|_| ())
            }),
        )?;
        let disk_stats = self.shared.cron.register(
            RefreshConfig::DISK_STATS_JOB_NAME,
            self.shared.config.disk_stats_interval(),
            true,
            weak_job(&self.shared, |shared| async move {
                shared.refresh_disk_stats().await.map(|_| ())
            }),
        )?;
        self.assistant.register()?;

        info!(
            "MoveServer started: {} workers, queue capacity {}",
            self.shared.config.move_workers, self.shared.config.move_queue_capacity
        );
        refresh.run().await;
        disk_stats.run().await;
        Ok(())
    }

    /// Stop background jobs and workers. Moves already running are abandoned
    /// by the server but not interrupted: a `mv` started by [`ShellMover`]
    /// keeps running to completion and its outcome is not recorded.
    pub fn shutdown(&self) {
        self.shared.cron.shutdown();
        let mut runtime = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        for worker in runtime.workers.drain(..) {
            worker.abort();
        }
        info!("MoveServer stopped");
    }
}

impl Drop for MoveServer {
    fn drop(&mut self) {
        let runtime = self.runtime.get_mut().unwrap_or_else(PoisonError::into_inner);
        for worker in runtime.workers.drain(..) {
            worker.abort();
        }
    }
}
