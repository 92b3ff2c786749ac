//! The set of directories a move may land in.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Move targets for one reconciliation cycle.
///
/// Display order is movie targets as configured, then every series target
/// (roots and discovered subdirectories) alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoveTargets {
    ordered: Vec<PathBuf>,
    #[serde(skip)]
    members: HashSet<PathBuf>,
}

impl MoveTargets {
    pub fn build(movies: &[PathBuf], series_roots: &[PathBuf], suggested: &[PathBuf]) -> Self {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();

        for target in movies {
            if members.insert(target.clone()) {
                ordered.push(target.clone());
            }
        }

        let mut series: Vec<&PathBuf> = series_roots.iter().chain(suggested).collect();
        series.sort();
        for target in series {
            if members.insert(target.clone()) {
                ordered.push(target.clone());
            }
        }

        Self { ordered, members }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
