//! Assistant handlers.

use crate::server::AppState;
use mediadeck_core::Result;
use serde_json::{json, Value};

pub async fn assistant_status(state: &AppState, _params: &Value) -> Result<Value> {
    Ok(serde_json::to_value(state.server.assistant().status())?)
}

pub async fn assistant_enable(state: &AppState, _params: &Value) -> Result<Value> {
    let assistant = state.server.assistant();
    assistant.enable();
    Ok(json!({ "success": true, "enabled": assistant.is_enabled() }))
}

pub async fn assistant_disable(state: &AppState, _params: &Value) -> Result<Value> {
    let assistant = state.server.assistant();
    assistant.disable();
    Ok(json!({ "success": true, "enabled": assistant.is_enabled() }))
}

pub async fn assistant_run_once(state: &AppState, _params: &Value) -> Result<Value> {
    let summary = state.server.assistant().run_once().await?;
    Ok(json!({
        "success": summary.errors.is_empty(),
        "summary": summary,
    }))
}
