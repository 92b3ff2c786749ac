//! Reconciliation and disk-usage refresh.

use std::path::{Path, PathBuf};
use std::sync::PoisonError;

use crate::api::state::Shared;
use crate::config::RefreshConfig;
use crate::disk_usage::filter_to_targets;
use crate::error::{MediaDeckError, Result};
use crate::models::{DiskStats, TorrentRecord};
use crate::registry::{Listings, ReconcileSummary};
use crate::MoveServer;
use tracing::{debug, warn};

/// Torrents downloading into `source_dir`, plus those that don't say where.
fn torrents_in(source_dir: &Path, torrents: Vec<TorrentRecord>) -> Vec<TorrentRecord> {
    torrents
        .into_iter()
        .filter(|t| t.download_dir.is_empty() || Path::new(&t.download_dir) == source_dir)
        .collect()
}

impl Shared {
    /// Fetch the three listings. Failed fetches come back as `None`.
    async fn collect_listings(&self) -> Result<Listings> {
        let lister = self.lister.clone();
        let source_dir = self.config.source_dir.clone();
        let series_roots = self.config.series_targets.clone();

        let (disk, suggested, failed_roots) = tokio::task::spawn_blocking(move || {
            let disk = match lister.list(&source_dir, 1, false) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    warn!("Listing {} failed: {}", source_dir.display(), e);
                    None
                }
            };
            let mut suggested: Vec<PathBuf> = Vec::new();
            let mut failed_roots: Vec<String> = Vec::new();
            for root in &series_roots {
                match lister.list(root, RefreshConfig::SERIES_LISTING_DEPTH, true) {
                    Ok(entries) => suggested.extend(entries),
                    Err(e) => failed_roots.push(e.to_string()),
                }
            }
            (disk, suggested, failed_roots)
        })
        .await
        .map_err(|e| MediaDeckError::Internal(format!("listing task failed: {e}")))?;

        for failure in &failed_roots {
            self.messages.log(
                "refresh.error",
                format!("Series targets incomplete: {failure}"),
            );
        }
        let suggested_targets = Some(suggested);

        let torrents = match self.torrents.list_all().await {
            Ok(all) => Some(torrents_in(&self.config.source_dir, all)),
            Err(e) => {
                self.messages.log(
                    "refresh.error",
                    format!("Listing torrents failed, keeping previous torrent state: {e}"),
                );
                None
            }
        };

        Ok(Listings {
            disk,
            torrents,
            suggested_targets,
        })
    }

    /// Run one reconciliation cycle.
    pub(crate) async fn refresh(&self) -> Result<ReconcileSummary> {
        let listings = self.collect_listings().await?;
        let mut registry = self.registry.lock().await;
        registry
            .reconcile(listings, &self.messages)
            .ok_or_else(|| MediaDeckError::Listing {
                root: self.config.source_dir.clone(),
                message: "source directory could not be listed".to_string(),
            })
    }

    /// Probe mounted filesystems and keep those holding a move target.
    pub(crate) async fn refresh_disk_stats(&self) -> Result<Vec<DiskStats>> {
        let prober = self.disk_prober.clone();
        let probed = tokio::task::spawn_blocking(move || prober.probe())
            .await
            .map_err(|e| MediaDeckError::Internal(format!("disk probe task failed: {e}")))?;

        let targets: Vec<PathBuf> = self
            .config
            .movie_targets
            .iter()
            .chain(&self.config.series_targets)
            .cloned()
            .collect();
        let (stats, result) = match probed {
            Ok(all) => {
                let kept = filter_to_targets(all, &targets);
                debug!("Disk stats refreshed: {} mounts", kept.len());
                (kept.clone(), Ok(kept))
            }
            Err(e) => {
                self.messages
                    .log("disk.error", format!("Reading disk usage failed: {e}"));
                (Vec::new(), Err(e))
            }
        };
        *self.disk_stats.lock().unwrap_or_else(PoisonError::into_inner) = stats;
        result
    }
}

impl MoveServer {
    /// Rebuild the registry from fresh listings now.
    ///
    /// Fails, leaving the registry untouched, only if the source directory
    /// could not be listed.
    pub async fn refresh(&self) -> Result<ReconcileSummary> {
        self.shared.refresh().await
    }

    /// Re-read disk usage now.
    pub async fn refresh_disk_stats(&self) -> Result<Vec<DiskStats>> {
        self.shared.refresh_disk_stats().await
    }
}
