//! Response wrapping for the dashboard.
//!
//! List queries come back as `{success: true, <key>: [...]}` so the dashboard
//! can tell an empty list from a failed call. Everything else passes through.

use serde_json::{json, Value};

/// Wrap list-returning methods under a named key.
pub fn wrap_response(method: &str, result: Value) -> Value {
    let key = match method {
        "get_items" => "items",
        "get_history" => "history",
        "get_disappeared" => "disappeared",
        "get_move_targets" => "targets",
        "get_disk_stats" | "refresh_disk_stats" => "disks",
        "get_messages" => "messages",
        "get_cron_jobs" => "jobs",
        _ => return result,
    };

    json!({
        "success": true,
        key: if result.is_null() { json!([]) } else { result }
    })
}
