//! Rebuild the registry from fresh listings.

use super::{MoveTargets, Registry};
use crate::messages::MessageLog;
use crate::models::{DisappearedEntry, Item, TorrentRecord};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Raw inputs of one reconciliation cycle. `None` marks a failed fetch.
#[derive(Debug, Clone, Default)]
pub struct Listings {
    /// Direct children of the source directory.
    pub disk: Option<Vec<PathBuf>>,
    pub torrents: Option<Vec<TorrentRecord>>,
    /// Directories found below the series roots.
    pub suggested_targets: Option<Vec<PathBuf>>,
}

/// What a successful cycle produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub items: usize,
    pub on_disk: usize,
    pub torrents: usize,
    pub disappeared: Vec<String>,
    pub move_targets: usize,
}

impl Registry {
    /// Replace the live registry with one built from `listings`.
    ///
    /// Returns `None` without touching anything when the disk listing is
    /// missing. Exactly one message is logged either way.
    pub fn reconcile(&mut self, listings: Listings, log: &MessageLog) -> Option<ReconcileSummary> {
        let Some(disk) = listings.disk else {
            log.log(
                "refresh.error",
                "Listing the source directory failed, keeping the previous state",
            );
            return None;
        };
        let torrents_known = listings.torrents.is_some();

        let mut fresh: BTreeMap<String, Item> = BTreeMap::new();
        for path in disk {
            let item = Item::from_disk(path, self.default_target.clone());
            fresh.insert(item.name.clone(), item);
        }
        let on_disk = fresh.len();

        let torrents = listings.torrents.unwrap_or_default();
        let torrent_count = torrents.len();
        for record in torrents {
            match fresh.get_mut(&record.name) {
                Some(item) => item.torrent = Some(record),
                None => {
                    let item = Item::from_torrent(record, self.default_target.clone());
                    fresh.insert(item.name.clone(), item);
                }
            }
        }

        let mut disappeared = Vec::new();
        for (name, previous) in std::mem::take(&mut self.items) {
            if let Some(item) = fresh.get_mut(&name) {
                item.carry_over(&previous);
                if !torrents_known && item.torrent.is_none() {
                    item.torrent = previous.torrent;
                }
            } else if previous.move_info.moving || (!torrents_known && previous.path.is_none()) {
                // In flight, or only the unreachable torrent client knew it.
                fresh.insert(name, previous);
            } else {
                disappeared.push(previous);
            }
        }

        for item in fresh.values_mut() {
            item.refresh_allow_move();
        }

        self.targets = MoveTargets::build(
            &self.movie_targets,
            &self.series_targets,
            listings.suggested_targets.as_deref().unwrap_or_default(),
        );

        let now = Utc::now();
        let summary = ReconcileSummary {
            items: fresh.len(),
            on_disk,
            torrents: torrent_count,
            disappeared: disappeared.iter().map(|i| i.name.clone()).collect(),
            move_targets: self.targets.len(),
        };
        self.push_disappeared(
            disappeared
                .into_iter()
                .map(|item| DisappearedEntry {
                    item,
                    noticed_at: now,
                })
                .collect(),
        );
        self.items = fresh;
        self.refreshed_at = Some(now);

        debug!("Reconciled registry: {:?}", summary);
        let mut message = format!(
            "Refreshed {} items ({} on disk, {} torrents), {} move targets",
            summary.items, summary.on_disk, summary.torrents, summary.move_targets
        );
        if !summary.disappeared.is_empty() {
            message.push_str(&format!(", disappeared: {}", summary.disappeared.join(", ")));
        }
        log.log("refresh.info", message);
        Some(summary)
    }
}
