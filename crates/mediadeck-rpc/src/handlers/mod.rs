//! JSON-RPC request handlers, split by domain.

mod assistant;
mod items;
mod status;

use crate::server::AppState;
use crate::wrapper::wrap_response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mediadeck_core::{MediaDeckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

// ============================================================================
// JSON-RPC types
// ============================================================================

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
            id,
        }
    }
}

// ============================================================================
// Parameter extraction helpers
// ============================================================================

/// Extract an optional string parameter.
pub(crate) fn get_str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Extract a required string parameter or return an error.
pub(crate) fn require_str_param(params: &Value, key: &str) -> Result<String> {
    get_str_param(params, key)
        .map(String::from)
        .ok_or_else(|| MediaDeckError::InvalidParams {
            message: format!("Missing required parameter: {}", key),
        })
}

/// Extract an optional bool parameter.
pub(crate) fn get_bool_param(params: &Value, key: &str) -> Option<bool> {
    params.get(key).and_then(|v| v.as_bool())
}

/// Extract a required bool parameter or return an error.
pub(crate) fn require_bool_param(params: &Value, key: &str) -> Result<bool> {
    get_bool_param(params, key).ok_or_else(|| MediaDeckError::InvalidParams {
        message: format!("Missing required parameter: {}", key),
    })
}

// ============================================================================
// HTTP endpoints
// ============================================================================

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    if method == "health_check" {
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::success(id, json!({"status": "ok"}))),
        );
    }

    let Some(result) = dispatch_method(&state, method, &params).await else {
        warn!("Unknown RPC method: {}", method);
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", method),
                None,
            )),
        );
    };

    match result {
        Ok(value) => {
            let wrapped = wrap_response(method, value);
            (StatusCode::OK, Json(JsonRpcResponse::success(id, wrapped)))
        }
        Err(e) => {
            let code = e.to_rpc_error_code();
            let data = e.rejection().map(|r| json!({ "reason": r.to_string() }));
            if data.is_some() {
                warn!("RPC {} rejected: {}", method, e);
            } else {
                error!("RPC error for {}: {}", method, e);
            }
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, code, e.to_string(), data)),
            )
        }
    }
}

// ============================================================================
// Method dispatcher
// ============================================================================

/// Dispatch a method call to the appropriate domain handler.
///
/// Returns `None` for methods this server does not know.
async fn dispatch_method(state: &AppState, method: &str, params: &Value) -> Option<Result<Value>> {
    let result = match method {
        // Items & moves
        "get_items" => items::get_items(state, params).await,
        "get_history" => items::get_history(state, params).await,
        "get_disappeared" => items::get_disappeared(state, params).await,
        "get_move_targets" => items::get_move_targets(state, params).await,
        "move_item" => items::move_item(state, params).await,
        "set_move_target" => items::set_move_target(state, params).await,
        "set_allow_assistant" => items::set_allow_assistant(state, params).await,
        "refresh" => items::refresh(state, params).await,

        // Status
        "get_status" => status::get_status(state, params).await,
        "get_queue_depth" => status::get_queue_depth(state, params).await,
        "get_disk_stats" => status::get_disk_stats(state, params).await,
        "refresh_disk_stats" => status::refresh_disk_stats(state, params).await,
        "get_messages" => status::get_messages(state, params).await,
        "get_cron_jobs" => status::get_cron_jobs(state, params).await,

        // Assistant
        "assistant_status" => assistant::assistant_status(state, params).await,
        "assistant_enable" => assistant::assistant_enable(state, params).await,
        "assistant_disable" => assistant::assistant_disable(state, params).await,
        "assistant_run_once" => assistant::assistant_run_once(state, params).await,

        _ => return None,
    };
    Some(result)
}
