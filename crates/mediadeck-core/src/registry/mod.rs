//! Item registry: the reconciled view of the download directory and the
//! torrent client.
//!
//! The registry is rebuilt wholesale on every reconciliation cycle (see
//! [`reconcile`]); continuity across rebuilds comes from keying by name and
//! carrying a small fixed set of fields forward.

mod reconcile;
mod targets;

pub use reconcile::{Listings, ReconcileSummary};
pub use targets::MoveTargets;

use crate::messages::trim_oldest;
use crate::models::{DisappearedEntry, HistoryEntry, Item};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Registry contents. Not synchronized itself; the owner wraps it in one
/// exclusive lock covering reads and writes.
#[derive(Debug, Default)]
pub struct Registry {
    items: BTreeMap<String, Item>,
    history: Vec<HistoryEntry>,
    disappeared: Vec<DisappearedEntry>,
    targets: MoveTargets,
    refreshed_at: Option<DateTime<Utc>>,
    movie_targets: Vec<PathBuf>,
    series_targets: Vec<PathBuf>,
    default_target: Option<PathBuf>,
}

impl Registry {
    /// Empty registry whose target set holds only the configured roots.
    pub fn new(
        movie_targets: Vec<PathBuf>,
        series_targets: Vec<PathBuf>,
        default_target: Option<PathBuf>,
    ) -> Self {
        let targets = MoveTargets::build(&movie_targets, &series_targets, &[]);
        Self {
            targets,
            movie_targets,
            series_targets,
            default_target,
            ..Default::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.items.get_mut(name)
    }

    /// Live items in name order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn disappeared(&self) -> &[DisappearedEntry] {
        &self.disappeared
    }

    pub fn targets(&self) -> &MoveTargets {
        &self.targets
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Take an item out of the live set after a successful move.
    pub(crate) fn retire(&mut self, name: &str) -> Option<Item> {
        self.items.remove(name)
    }

    pub(crate) fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        trim_oldest(&mut self.history);
    }

    fn push_disappeared(&mut self, entries: Vec<DisappearedEntry>) {
        self.disappeared.extend(entries);
        trim_oldest(&mut self.disappeared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_knows_configured_roots() {
        let registry = Registry::new(vec!["/m".into()], vec!["/s".into()], None);
        assert!(registry.is_empty());
        assert_eq!(registry.targets().len(), 2);
        assert!(registry.refreshed_at().is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut registry = Registry::new(vec!["/m".into()], vec![], None);
        let item = Item::from_disk("/src/a".into(), None);
        for _ in 0..crate::config::MessageConfig::MAX_ENTRIES + 1 {
            registry.push_history(HistoryEntry {
                item: item.clone(),
                moved_to: None,
                moved_at: Utc::now(),
            });
        }
        assert_eq!(
            registry.history().len(),
            crate::config::MessageConfig::TRIM_TO
        );
    }
}
