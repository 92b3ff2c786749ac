//! Read-only snapshots.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use chrono::{DateTime, Utc};

use crate::cron::{CronJob, CronJobStatus};
use crate::messages::LogMessage;
use crate::models::{DisappearedEntry, DiskStats, HistoryEntry, Item};
use crate::moves::QueueDepth;
use crate::MoveServer;

impl MoveServer {
    /// Live items sorted by name.
    pub async fn items(&self) -> Vec<Item> {
        let registry = self.shared.registry.lock().await;
        registry.items().cloned().collect()
    }

    pub async fn item(&self, name: &str) -> Option<Item> {
        let registry = self.shared.registry.lock().await;
        registry.get(name).cloned()
    }

    /// Successful moves, oldest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        let registry = self.shared.registry.lock().await;
        registry.history().to_vec()
    }

    /// Items that vanished without being moved, oldest first.
    pub async fn disappeared(&self) -> Vec<DisappearedEntry> {
        let registry = self.shared.registry.lock().await;
        registry.disappeared().to_vec()
    }

    /// Movie targets first, then series roots and their subdirectories.
    pub async fn move_targets(&self) -> Vec<PathBuf> {
        let registry = self.shared.registry.lock().await;
        registry.targets().as_slice().to_vec()
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.shared.registry.lock().await.refreshed_at()
    }

    pub fn queue_depth(&self) -> QueueDepth {
        self.shared.queue.depth()
    }

    pub fn disk_stats(&self) -> Vec<DiskStats> {
        self.shared
            .disk_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Newest first.
    pub fn messages(&self) -> Vec<LogMessage> {
        self.shared.messages.messages()
    }

    pub fn cron_jobs(&self) -> Vec<CronJobStatus> {
        self.shared.cron.jobs()
    }

    /// A registered background job, once [`MoveServer::start`] has run.
    pub fn cron_job(&self, name: &str) -> Option<Arc<CronJob>> {
        self.shared.cron.get(name)
    }
}
