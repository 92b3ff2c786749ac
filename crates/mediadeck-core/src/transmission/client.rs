//! Transmission RPC client.

use super::TorrentClient;
use crate::config::{TransmissionConfig, TransmissionSettings};
use crate::error::{MediaDeckError, Result};
use crate::models::TorrentRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use url::Url;

const TORRENT_FIELDS: &[&str] = &[
    "id",
    "name",
    "percentDone",
    "status",
    "addedDate",
    "doneDate",
    "downloadDir",
    "isFinished",
    "error",
    "errorString",
    "magnetLink",
];

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Default, Deserialize)]
struct TorrentList {
    #[serde(default)]
    torrents: Vec<TorrentRecord>,
}

/// Talks to a Transmission daemon over its JSON RPC endpoint.
pub struct TransmissionClient {
    client: Client,
    url: Url,
    username: Option<String>,
    password: Option<String>,
    session_id: Mutex<Option<String>>,
}

impl std::fmt::Debug for TransmissionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransmissionClient")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl TransmissionClient {
    pub fn new(settings: &TransmissionSettings) -> Result<Self> {
        let url = Url::parse(&settings.url).map_err(|e| MediaDeckError::Config {
            message: format!("invalid transmission url {}: {}", settings.url, e),
        })?;
        let client = Client::builder()
            .timeout(TransmissionConfig::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MediaDeckError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: None,
            })?;
        Ok(Self {
            client,
            url,
            username: settings.username.clone(),
            password: settings.password.clone(),
            session_id: Mutex::new(None),
        })
    }

    fn session_id(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response> {
        let mut request = self.client.post(self.url.clone()).json(body);
        if let Some(user) = &self.username {
            request = request.basic_auth(user, self.password.as_ref());
        }
        if let Some(id) = self.session_id() {
            request = request.header(TransmissionConfig::SESSION_HEADER, id);
        }
        Ok(request.send().await?)
    }

    /// Invoke `method`, renewing the session id once if the daemon asks.
    async fn call(&self, method: &str, arguments: Value) -> Result<Value> {
        let body = json!({ "method": method, "arguments": arguments });
        let mut response = self.post(&body).await?;

        if response.status() == StatusCode::CONFLICT {
            let renewed = response
                .headers()
                .get(TransmissionConfig::SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            debug!("Transmission session renewed");
            *self
                .session_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = renewed;
            response = self.post(&body).await?;
        }

        let response = response.error_for_status()?;
        let parsed: RpcResponse = response.json().await?;
        into_arguments(method, parsed)
    }
}

fn into_arguments(method: &str, response: RpcResponse) -> Result<Value> {
    if response.result != "success" {
        return Err(MediaDeckError::TorrentClient {
            message: format!("{method}: {}", response.result),
        });
    }
    Ok(response.arguments)
}

fn ids(torrents: &[TorrentRecord]) -> Vec<i64> {
    torrents.iter().map(|t| t.id).collect()
}

#[async_trait]
impl TorrentClient for TransmissionClient {
    async fn list_all(&self) -> Result<Vec<TorrentRecord>> {
        let arguments = self
            .call("torrent-get", json!({ "fields": TORRENT_FIELDS }))
            .await?;
        let list: TorrentList = serde_json::from_value(arguments)?;
        debug!("Transmission reports {} torrents", list.torrents.len());
        Ok(list.torrents)
    }

    async fn remove(&self, torrents: &[TorrentRecord]) -> Result<()> {
        if torrents.is_empty() {
            return Ok(());
        }
        self.call(
            "torrent-remove",
            json!({ "ids": ids(torrents), "delete-local-data": false }),
        )
        .await?;
        Ok(())
    }

    async fn start(&self, torrents: &[TorrentRecord]) -> Result<()> {
        if torrents.is_empty() {
            return Ok(());
        }
        self.call("torrent-start", json!({ "ids": ids(torrents) }))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let settings = TransmissionSettings {
            url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            TransmissionClient::new(&settings),
            Err(MediaDeckError::Config { .. })
        ));
    }

    #[test]
    fn test_non_success_result_is_error() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"result": "duplicate torrent", "arguments": {}}"#).unwrap();
        let err = into_arguments("torrent-start", response).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Torrent client error: torrent-start: duplicate torrent"
        );
        assert_eq!(err.to_rpc_error_code(), -32000);
    }

    #[test]
    fn test_parses_torrent_get_arguments() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"result": "success", "arguments": {"torrents": [
                {"id": 1, "name": "a", "percentDone": 0.5, "status": 4},
                {"id": 2, "name": "b", "percentDone": 1.0, "status": 0}
            ]}}"#,
        )
        .unwrap();
        let list: TorrentList =
            serde_json::from_value(into_arguments("torrent-get", response).unwrap()).unwrap();
        assert_eq!(list.torrents.len(), 2);
        assert!(!list.torrents[0].is_paused());
        assert!(list.torrents[1].is_downloaded());
    }

    #[tokio::test]
    async fn test_empty_id_lists_skip_the_request() {
        // Nothing listens here; a request would fail.
        let settings = TransmissionSettings {
            url: "http://127.0.0.1:9/transmission/rpc".into(),
            ..Default::default()
        };
        let client = TransmissionClient::new(&settings).unwrap();
        assert!(client.remove(&[]).await.is_ok());
        assert!(client.start(&[]).await.is_ok());
    }
}
