//! HTTP JSON-RPC client for a Soroban RPC node, backed by `reqwest`.
//!
//! The client performs one HTTP request per call and maps every failure
//! into a [`TransportError`]. Retrying is left to the caller; the event
//! poller applies its own backoff schedule on top of this client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use sorokit_core::error::TransportError;
use sorokit_core::event::{GetEventsRequest, GetEventsResponse};
use sorokit_core::request::{JsonRpcRequest, JsonRpcResponse};
use sorokit_core::source::EventSource;

use crate::types::{
    Health, LatestLedger, SendTransactionResponse, SimulateTransactionResponse, TransactionEnvelope,
};

fn default_request_timeout_ms() -> u64 {
    30_000
}

/// Configuration for [`SorobanRpcClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcClientConfig {
    /// Per-request HTTP timeout (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl RpcClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// JSON-RPC client for one Soroban RPC endpoint.
pub struct SorobanRpcClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
    request_timeout: Duration,
}

impl SorobanRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: RpcClientConfig) -> Result<Self, TransportError> {
        let request_timeout = config.request_timeout();
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            next_id: AtomicU64::new(1),
            request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, RpcClientConfig::default())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` with named `params` and deserialize the result.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);
        tracing::debug!(method, id, url = %self.url, "sending request");

        let resp = self.send_once(&req).await?;
        let result = resp.into_result().map_err(|e| {
            tracing::debug!(method, code = e.code, message = %e.message, "node returned error");
            TransportError::Rpc(e)
        })?;
        Ok(serde_json::from_value(result)?)
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| request_error(e, self.request_timeout))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| TransportError::malformed(e.to_string()))
    }

    /// `getEvents` exactly as requested.
    pub async fn get_events_page(&self, req: &GetEventsRequest) -> Result<GetEventsResponse, TransportError> {
        self.call("getEvents", events_params(req)).await
    }

    pub async fn get_latest_ledger(&self) -> Result<LatestLedger, TransportError> {
        self.call("getLatestLedger", Value::Null).await
    }

    pub async fn get_health(&self) -> Result<Health, TransportError> {
        self.call("getHealth", Value::Null).await
    }

    pub async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, TransportError> {
        self.call("simulateTransaction", json!({ "transaction": envelope.as_str() }))
            .await
    }

    pub async fn send_transaction(
        &self,
        signed: &TransactionEnvelope,
    ) -> Result<SendTransactionResponse, TransportError> {
        self.call("sendTransaction", json!({ "transaction": signed.as_str() }))
            .await
    }
}

#[async_trait]
impl EventSource for SorobanRpcClient {
    /// Queries without a cursor or start ledger begin at the latest ledger.
    async fn get_events(&self, mut req: GetEventsRequest) -> Result<GetEventsResponse, TransportError> {
        if req.cursor.is_none() && req.start_ledger.is_none() {
            let latest = self.get_latest_ledger().await?;
            tracing::debug!(start_ledger = latest.sequence, "no cursor; starting at latest ledger");
            req.start_ledger = Some(latest.sequence);
        }
        self.get_events_page(&req).await
    }

    fn name(&self) -> &str {
        &self.url
    }
}

/// Map a failed HTTP exchange; timeouts keep the configured limit.
fn request_error(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            ms: timeout.as_millis() as u64,
        }
    } else {
        TransportError::Http(e.to_string())
    }
}

fn status_error(status: u16, body: &str) -> TransportError {
    TransportError::Http(format!("HTTP {status}: {body}"))
}

/// Named params of a `getEvents` call.
///
/// Cursor and limit travel in `pagination`. `startLedger` is only sent
/// without a cursor, since the node rejects both together.
pub fn events_params(req: &GetEventsRequest) -> Value {
    let mut pagination = Map::new();
    if let Some(cursor) = &req.cursor {
        pagination.insert("cursor".into(), json!(cursor));
    }
    pagination.insert("limit".into(), json!(req.limit));

    let mut params = json!({
        "filters": req.filters,
        "pagination": pagination,
    });
    if let (None, Some(start)) = (&req.cursor, req.start_ledger) {
        params["startLedger"] = json!(start);
    }
    params
}
