//! Bounded move request queue.

use crate::error::{MediaDeckError, MoveRejection, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;

/// A validated move waiting for a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Queue capacity and the number of requests not yet picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDepth {
    pub capacity: usize,
    pub len: usize,
}

/// Receiving half shared by all workers.
pub(crate) type MoveReceiver = Arc<Mutex<mpsc::Receiver<MoveRequest>>>;

/// Sending half of the move queue.
pub struct MoveQueue {
    sender: mpsc::Sender<MoveRequest>,
}

impl MoveQueue {
    pub(crate) fn new(capacity: usize) -> (Self, MoveReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, Arc::new(Mutex::new(receiver)))
    }

    pub fn depth(&self) -> QueueDepth {
        let capacity = self.sender.max_capacity();
        QueueDepth {
            capacity,
            len: capacity - self.sender.capacity(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.sender.capacity() == 0
    }

    /// Enqueue without waiting; a full queue is a rejection.
    pub(crate) fn try_push(&self, request: MoveRequest) -> Result<()> {
        match self.sender.try_send(request) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(MoveRejection::BufferFull {
                capacity: self.sender.max_capacity(),
            }
            .into()),
            Err(TrySendError::Closed(request)) => Err(MediaDeckError::Internal(format!(
                "move queue closed, dropping move of {}",
                request.name
            ))),
        }
    }
}
