//! Pre-flight checks gating a move.

use super::queue::{MoveQueue, MoveRequest};
use crate::error::{MediaDeckError, MoveRejection, Result};
use crate::registry::Registry;

/// Check whether `name` may be queued for a move right now.
///
/// The "currently moving" check runs before the `allow_move` check because a
/// moving item always has `allow_move == false` and the more specific reason
/// is the useful one.
pub(crate) fn validate(registry: &Registry, queue: &MoveQueue, name: &str) -> Result<MoveRequest> {
    let item = registry
        .get(name)
        .ok_or_else(|| MediaDeckError::ItemNotFound {
            name: name.to_string(),
        })?;

    let Some(source) = item.path.as_ref() else {
        return Err(MoveRejection::NoPath {
            name: name.to_string(),
        }
        .into());
    };
    if item.move_info.moving {
        let target = item
            .move_info
            .target
            .as_ref()
            .map(|t| t.display().to_string())
            .unwrap_or_default();
        return Err(MoveRejection::CurrentlyMoving {
            name: name.to_string(),
            target,
        }
        .into());
    }
    if !item.allow_move {
        return Err(MoveRejection::NotAllowed {
            name: name.to_string(),
        }
        .into());
    }
    if !source.exists() {
        return Err(MoveRejection::SourceMissing(source.clone()).into());
    }
    let Some(move_to) = item.move_to.as_ref() else {
        return Err(MoveRejection::NoTarget {
            name: name.to_string(),
        }
        .into());
    };
    if !registry.targets().contains(move_to) {
        return Err(MoveRejection::UnknownTarget(move_to.clone()).into());
    }
    if !move_to.is_dir() {
        return Err(MoveRejection::TargetMissing(move_to.clone()).into());
    }
    if queue.is_full() {
        return Err(MoveRejection::BufferFull {
            capacity: queue.depth().capacity,
        }
        .into());
    }

    let file_name = source
        .file_name()
        .ok_or_else(|| MediaDeckError::Internal(format!("{} has no file name", source.display())))?;
    Ok(MoveRequest {
        name: name.to_string(),
        source: source.clone(),
        destination: move_to.join(file_name),
    })
}

/// Validate, enqueue, and mark the item as moving.
///
/// Callers hold the registry lock across the whole call, so validation and
/// the capacity check cannot race another producer.
pub(crate) fn request_move(
    registry: &mut Registry,
    queue: &MoveQueue,
    name: &str,
) -> Result<MoveRequest> {
    let request = validate(registry, queue, name)?;
    queue.try_push(request.clone())?;

    let item = registry
        .get_mut(name)
        .ok_or_else(|| MediaDeckError::Internal(format!("{name} vanished while queueing")))?;
    item.move_info.moving = true;
    item.move_info.target = Some(request.destination.clone());
    item.move_info.last_error = None;
    item.move_info.last_error_output.clear();
    item.refresh_allow_move();
    Ok(request)
}
