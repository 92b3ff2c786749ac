//! Move requests and per-item settings.

use std::path::PathBuf;

use crate::error::{MediaDeckError, MoveRejection, Result};
use crate::moves::{record_result, request_move, MoveRequest};
use crate::MoveServer;

impl MoveServer {
    /// Queue the item called `name` for a move to its chosen target.
    ///
    /// Never blocks on the queue: a full queue is reported as
    /// [`MoveRejection::BufferFull`].
    pub async fn move_item(&self, name: &str) -> Result<MoveRequest> {
        let shared = &self.shared;
        let mut registry = shared.registry.lock().await;
        match request_move(&mut registry, &shared.queue, name) {
            Ok(request) => {
                shared.messages.log(
                    "move.info",
                    format!(
                        "Queued move of {} to {}",
                        name,
                        request.destination.display()
                    ),
                );
                Ok(request)
            }
            Err(e) => {
                shared
                    .messages
                    .log("move.error", format!("Move of {name} refused: {e}"));
                Err(e)
            }
        }
    }

    /// Choose where `name` will be moved. `target` must be a current move
    /// target and the item must not be moving.
    pub async fn set_move_target(&self, name: &str, target: impl Into<PathBuf>) -> Result<()> {
        let target = target.into();
        let mut registry = self.shared.registry.lock().await;
        if !registry.targets().contains(&target) {
            return Err(MoveRejection::UnknownTarget(target).into());
        }
        let item = registry
            .get_mut(name)
            .ok_or_else(|| MediaDeckError::ItemNotFound {
                name: name.to_string(),
            })?;
        if item.move_info.moving {
            let in_flight = item
                .move_info
                .target
                .as_ref()
                .map(|t| t.display().to_string())
                .unwrap_or_default();
            return Err(MoveRejection::CurrentlyMoving {
                name: name.to_string(),
                target: in_flight,
            }
            .into());
        }
        item.move_to = Some(target);
        Ok(())
    }

    /// Let the assistant act on `name`, or stop it from doing so.
    pub async fn set_allow_assistant(&self, name: &str, allow: bool) -> Result<()> {
        let mut registry = self.shared.registry.lock().await;
        let item = registry
            .get_mut(name)
            .ok_or_else(|| MediaDeckError::ItemNotFound {
                name: name.to_string(),
            })?;
        item.allow_assistant = allow;
        Ok(())
    }

    /// Record the outcome of a move of `name`, as the workers do.
    pub async fn report_result(
        &self,
        name: &str,
        error: Option<String>,
        output: impl Into<String>,
    ) -> Result<()> {
        let mut registry = self.shared.registry.lock().await;
        record_result(&mut registry, &self.shared.messages, name, error, output.into())
    }
}
