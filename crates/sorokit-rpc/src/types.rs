//! Request and response bodies of the Soroban RPC methods used here.

use serde::{Deserialize, Serialize};
use sorokit_codec::WireValue;
use sorokit_core::error::{InvokeError, TransportError};

/// A base64 XDR transaction envelope, signed or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionEnvelope(String);

impl TransactionEnvelope {
    pub fn new(base64_xdr: impl Into<String>) -> Self {
        Self(base64_xdr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `getLatestLedger` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestLedger {
    pub id: String,
    pub protocol_version: u32,
    pub sequence: u64,
}

/// `getHealth` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub latest_ledger: Option<u64>,
    #[serde(default)]
    pub oldest_ledger: Option<u64>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// One host-function result of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateHostFunctionResult {
    /// Base64 XDR return value.
    pub xdr: String,
    #[serde(default)]
    pub auth: Vec<String>,
}

/// `simulateTransaction` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
    pub latest_ledger: u64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<SimulateHostFunctionResult>,
    #[serde(default)]
    pub min_resource_fee: Option<String>,
    #[serde(default)]
    pub transaction_data: Option<String>,
}

/// Outcome of simulating a contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationResult {
    Success { retval: WireValue },
    Failure { error: String },
}

impl SimulateTransactionResponse {
    /// Reduce to the call outcome: the node's error, or the first result's
    /// return value.
    pub fn outcome(&self) -> Result<SimulationResult, InvokeError> {
        if let Some(error) = &self.error {
            return Ok(SimulationResult::Failure {
                error: error.clone(),
            });
        }
        let first = self
            .results
            .first()
            .ok_or_else(|| TransportError::malformed("simulation returned no results"))?;
        Ok(SimulationResult::Success {
            retval: WireValue::from_base64(&first.xdr)?,
        })
    }
}

/// `sendTransaction` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub hash: String,
    /// `PENDING`, `DUPLICATE`, `TRY_AGAIN_LATER` or `ERROR`.
    pub status: String,
    pub latest_ledger: u64,
    #[serde(default)]
    pub error_result_xdr: Option<String>,
}

impl SendTransactionResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status.as_str(), "PENDING" | "DUPLICATE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simulation_success_decodes_first_result() {
        let resp: SimulateTransactionResponse = serde_json::from_value(json!({
            "latestLedger": 100,
            "minResourceFee": "5000",
            "results": [{ "xdr": "AAAAAwAAAAE=", "auth": [] }]
        }))
        .unwrap();
        assert_eq!(
            resp.outcome().unwrap(),
            SimulationResult::Success {
                retval: WireValue::U32(1)
            }
        );
    }

    #[test]
    fn simulation_error_wins_over_results() {
        let resp: SimulateTransactionResponse = serde_json::from_value(json!({
            "latestLedger": 100,
            "error": "HostError: Error(Contract, #3)"
        }))
        .unwrap();
        assert!(matches!(resp.outcome().unwrap(), SimulationResult::Failure { error } if error.contains("#3")));
    }

    #[test]
    fn simulation_without_results_is_malformed() {
        let resp: SimulateTransactionResponse =
            serde_json::from_value(json!({ "latestLedger": 1 })).unwrap();
        assert!(matches!(
            resp.outcome(),
            Err(InvokeError::Transport(TransportError::MalformedResponse { .. }))
        ));
    }

    #[test]
    fn simulation_with_bad_xdr_is_wire_error() {
        let resp: SimulateTransactionResponse = serde_json::from_value(json!({
            "latestLedger": 1,
            "results": [{ "xdr": "AAAA" }]
        }))
        .unwrap();
        assert!(matches!(resp.outcome(), Err(InvokeError::Wire(_))));
    }

    #[test]
    fn send_status() {
        let resp: SendTransactionResponse = serde_json::from_value(json!({
            "hash": "ab",
            "status": "PENDING",
            "latestLedger": 9
        }))
        .unwrap();
        assert!(resp.is_accepted());
        assert_eq!(resp.error_result_xdr, None);
    }

    #[test]
    fn envelope_is_transparent() {
        let env = TransactionEnvelope::new("AAAA");
        assert_eq!(serde_json::to_value(&env).unwrap(), json!("AAAA"));
    }
}
