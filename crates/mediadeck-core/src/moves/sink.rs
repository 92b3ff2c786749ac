//! Write move outcomes back into the registry.

use crate::error::{MediaDeckError, Result};
use crate::messages::MessageLog;
use crate::models::HistoryEntry;
use crate::registry::Registry;
use chrono::Utc;
use tracing::error;

/// Apply the outcome of a finished move to the item called `name`.
///
/// A success retires the item into history; a failure leaves it live with
/// the error recorded and its target cleared so it can be retried. Results
/// for items that are not moving are refused and leave the item untouched.
pub(crate) fn record_result(
    registry: &mut Registry,
    log: &MessageLog,
    name: &str,
    move_error: Option<String>,
    output: String,
) -> Result<()> {
    let Some(item) = registry.get_mut(name) else {
        error!("Move result for {} which is no longer in the registry", name);
        log.log(
            "move.error",
            format!("Internal error: move finished for unknown item {name}"),
        );
        return Err(MediaDeckError::Internal(format!(
            "move result for unknown item {name}"
        )));
    };

    if !item.move_info.moving {
        log.log(
            "move.error",
            format!("Internal error: move result for {name} which is not moving"),
        );
        return Err(MediaDeckError::Internal(format!(
            "move result for {name} which is not moving"
        )));
    }

    item.move_info.moving = false;
    match move_error {
        None => {
            let target = item.move_info.target.clone();
            item.move_info.last_error = None;
            item.move_info.last_error_output.clear();
            let Some(mut finished) = registry.retire(name) else {
                return Err(MediaDeckError::Internal(format!("{name} vanished during retire")));
            };
            finished.refresh_allow_move();
            let destination = target
                .as_ref()
                .map(|t| t.display().to_string())
                .unwrap_or_default();
            registry.push_history(HistoryEntry {
                item: finished,
                moved_to: target,
                moved_at: Utc::now(),
            });
            log.log("move.info", format!("Moved {name} to {destination}"));
        }
        Some(message) => {
            let destination = item
                .move_info
                .target
                .take()
                .map(|t| t.display().to_string())
                .unwrap_or_default();
            item.move_info.last_error = Some(message.clone());
            item.move_info.last_error_output = output;
            item.refresh_allow_move();
            log.log(
                "move.error",
                format!("Moving {name} to {destination} failed: {message}"),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::registry::Listings;
    use std::path::PathBuf;

    fn moving_registry(log: &MessageLog) -> Registry {
        let mut registry = Registry::new(vec!["/dst".into()], vec![], Some("/dst".into()));
        registry.reconcile(
            Listings {
                disk: Some(vec!["/src/foo".into()]),
                torrents: Some(vec![]),
                suggested_targets: None,
            },
            log,
        );
        let item = registry.get_mut("foo").unwrap();
        item.move_info.moving = true;
        item.move_info.target = Some("/dst/foo".into());
        item.refresh_allow_move();
        registry
    }

    #[test]
    fn test_success_moves_item_to_history() {
        let log = MessageLog::new();
        let mut registry = moving_registry(&log);

        record_result(&mut registry, &log, "foo", None, String::new()).unwrap();

        assert!(registry.get("foo").is_none());
        let entry = &registry.history()[0];
        assert_eq!(entry.item.name, "foo");
        assert!(!entry.item.move_info.moving);
        assert!(entry.item.move_info.last_error.is_none());
        assert_eq!(entry.moved_to, Some(PathBuf::from("/dst/foo")));
        assert_eq!(log.messages()[0].kind, "move.info");
    }

    #[test]
    fn test_failure_keeps_item_retryable() {
        let log = MessageLog::new();
        let mut registry = moving_registry(&log);

        record_result(
            &mut registry,
            &log,
            "foo",
            Some("mv exited with 1".into()),
            "mv: cannot move".into(),
        )
        .unwrap();

        let item: &Item = registry.get("foo").unwrap();
        assert!(!item.move_info.moving);
        assert_eq!(item.move_info.last_error.as_deref(), Some("mv exited with 1"));
        assert_eq!(item.move_info.last_error_output, "mv: cannot move");
        assert!(item.move_info.target.is_none());
        assert!(item.allow_move);
        assert!(registry.history().is_empty());
        assert_eq!(log.messages()[0].kind, "move.error");
    }

    #[test]
    fn test_result_for_idle_item_is_refused() {
        let log = MessageLog::new();
        let mut registry = moving_registry(&log);
        registry.get_mut("foo").unwrap().move_info.moving = false;

        let err = record_result(&mut registry, &log, "foo", None, String::new()).unwrap_err();
        assert!(matches!(err, MediaDeckError::Internal(_)));
        assert!(registry.get("foo").is_some());
        assert!(registry.history().is_empty());
        assert_eq!(log.messages()[0].kind, "move.error");
    }

    #[test]
    fn test_unknown_item_is_internal_error() {
        let log = MessageLog::new();
        let mut registry = Registry::default();
        let err = record_result(&mut registry, &log, "ghost", None, String::new()).unwrap_err();
        assert!(matches!(err, MediaDeckError::Internal(_)));
        assert_eq!(log.len(), 1);
    }
}
