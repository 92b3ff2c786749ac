//! Bounded, newest-first audit log shared by the reconciler, the move
//! pipeline and the assistant.
//!
//! The ring is trimmed in batches: once it holds more than
//! [`MessageConfig::MAX_ENTRIES`] messages it drops back to the newest
//! [`MessageConfig::TRIM_TO`]. The retained count therefore moves between
//! those two bounds instead of sitting at a fixed window.

use crate::config::MessageConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Dotted source and kind, e.g. `move.error` or `assistant.tick`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Thread-safe message ring.
///
/// Guarded by its own lock so logging never waits on the registry.
pub struct MessageLog {
    state: Mutex<VecDeque<LogMessage>>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(VecDeque::new()),
        }
    }

    /// Record a message and mirror it to `tracing`.
    pub fn log(&self, kind: impl Into<String>, message: impl Into<String>) {
        let entry = LogMessage {
            kind: kind.into(),
            message: message.into(),
            timestamp: Utc::now(),
        };
        if entry.kind.ends_with(".error") {
            warn!("[{}] {}", entry.kind, entry.message);
        } else {
            info!("[{}] {}", entry.kind, entry.message);
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.push_front(entry);
        if state.len() > MessageConfig::MAX_ENTRIES {
            state.truncate(MessageConfig::TRIM_TO);
        }
    }

    /// Snapshot, newest first.
    pub fn messages(&self) -> Vec<LogMessage> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Batch-trim a chronological (oldest-first) list to its newest entries.
pub(crate) fn trim_oldest<T>(entries: &mut Vec<T>) {
    if entries.len() > MessageConfig::MAX_ENTRIES {
        let excess = entries.len() - MessageConfig::TRIM_TO;
        entries.drain(..excess);
    }
}
