//! Item, history and move handlers.

use super::{require_bool_param, require_str_param};
use crate::server::AppState;
use mediadeck_core::Result;
use serde_json::{json, Value};

pub async fn get_items(state: &AppState, _params: &Value) -> Result<Value> {
    let items = state.server.items().await;
    Ok(serde_json::to_value(items)?)
}

pub async fn get_history(state: &AppState, _params: &Value) -> Result<Value> {
    let history = state.server.history().await;
    Ok(serde_json::to_value(history)?)
}

pub async fn get_disappeared(state: &AppState, _params: &Value) -> Result<Value> {
    let disappeared = state.server.disappeared().await;
    Ok(serde_json::to_value(disappeared)?)
}

pub async fn get_move_targets(state: &AppState, _params: &Value) -> Result<Value> {
    let targets = state.server.move_targets().await;
    Ok(serde_json::to_value(targets)?)
}

pub async fn move_item(state: &AppState, params: &Value) -> Result<Value> {
    let name = require_str_param(params, "name")?;
    let request = state.server.move_item(&name).await?;
    Ok(json!({
        "success": true,
        "request": request,
    }))
}

pub async fn set_move_target(state: &AppState, params: &Value) -> Result<Value> {
    let name = require_str_param(params, "name")?;
    let target = require_str_param(params, "target")?;
    state.server.set_move_target(&name, target).await?;
    Ok(json!({ "success": true }))
}

pub async fn set_allow_assistant(state: &AppState, params: &Value) -> Result<Value> {
    let name = require_str_param(params, "name")?;
    let allow = require_bool_param(params, "allow")?;
    state.server.set_allow_assistant(&name, allow).await?;
    Ok(json!({ "success": true }))
}

pub async fn refresh(state: &AppState, _params: &Value) -> Result<Value> {
    let summary = state.server.refresh().await?;
    Ok(json!({
        "success": true,
        "summary": summary,
    }))
}
