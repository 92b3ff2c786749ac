//! Long-lived move workers.

use super::mover::Mover;
use super::queue::MoveReceiver;
use super::sink::record_result;
use crate::messages::MessageLog;
use crate::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Spawn `count` workers draining `receiver`.
///
/// Each worker executes one move at a time and exits once every sender of
/// the queue is gone.
pub(crate) fn spawn_workers(
    count: usize,
    receiver: MoveReceiver,
    mover: Arc<dyn Mover>,
    registry: Arc<Mutex<Registry>>,
    log: Arc<MessageLog>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let receiver = receiver.clone();
            let mover = mover.clone();
            let registry = registry.clone();
            let log = log.clone();
            tokio::spawn(async move {
                debug!("Move worker {} started", id);
                loop {
                    let next = receiver.lock().await.recv().await;
                    let Some(request) = next else {
                        break;
                    };

                    info!(
                        "Worker {} moving {} -> {}",
                        id,
                        request.source.display(),
                        request.destination.display()
                    );
                    let outcome = mover
                        .move_path(&request.source, &request.destination)
                        .await;

                    let mut registry = registry.lock().await;
                    if let Err(e) = record_result(
                        &mut registry,
                        &log,
                        &request.name,
                        outcome.error,
                        outcome.output,
                    ) {
                        warn!("Worker {} could not record result: {}", id, e);
                    }
                }
                debug!("Move worker {} stopped", id);
            })
        })
        .collect()
}
