//! Status, disk usage and log handlers.

use crate::server::AppState;
use mediadeck_core::Result;
use serde_json::{json, Value};

pub async fn get_status(state: &AppState, _params: &Value) -> Result<Value> {
    let server = &state.server;
    let items = server.items().await;
    let moving = items.iter().filter(|i| i.move_info.moving).count();
    Ok(json!({
        "success": true,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "refreshed_at": server.refreshed_at().await,
        "items": items.len(),
        "moving": moving,
        "queue": server.queue_depth(),
        "assistant_enabled": server.assistant().is_enabled(),
    }))
}

pub async fn get_queue_depth(state: &AppState, _params: &Value) -> Result<Value> {
    Ok(serde_json::to_value(state.server.queue_depth())?)
}

pub async fn get_disk_stats(state: &AppState, _params: &Value) -> Result<Value> {
    Ok(serde_json::to_value(state.server.disk_stats())?)
}

pub async fn refresh_disk_stats(state: &AppState, _params: &Value) -> Result<Value> {
    let stats = state.server.refresh_disk_stats().await?;
    Ok(serde_json::to_value(stats)?)
}

pub async fn get_messages(state: &AppState, _params: &Value) -> Result<Value> {
    Ok(serde_json::to_value(state.server.messages())?)
}

pub async fn get_cron_jobs(state: &AppState, _params: &Value) -> Result<Value> {
    Ok(serde_json::to_value(state.server.cron_jobs())?)
}
