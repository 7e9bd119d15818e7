//! Typed contract calls over a ledger client.
//!
//! Building and signing transaction envelopes needs account state and keys,
//! so it sits behind the [`LedgerClient`] trait. [`ContractClient`] only
//! encodes arguments going in and decodes return values coming out.

use std::sync::Arc;

use async_trait::async_trait;
use sorokit_codec::{decode_with, encode_args, DecodeMode, TypedArg, TypedValue, WireValue};
use sorokit_core::error::InvokeError;

use crate::types::{SendTransactionResponse, SimulationResult, TransactionEnvelope};

/// Builds, simulates and submits contract-call transactions.
#[async_trait]
pub trait LedgerClient: Send + Sync + 'static {
    /// Build an unsigned envelope invoking `function` on `contract_id`.
    async fn call(
        &self,
        contract_id: &str,
        function: &str,
        args: Vec<WireValue>,
    ) -> Result<TransactionEnvelope, InvokeError>;

    async fn simulate(&self, envelope: &TransactionEnvelope) -> Result<SimulationResult, InvokeError>;

    async fn submit(&self, signed: &TransactionEnvelope) -> Result<SendTransactionResponse, InvokeError>;
}

/// Client for one deployed contract.
#[derive(Clone)]
pub struct ContractClient {
    ledger: Arc<dyn LedgerClient>,
    contract_id: String,
    decode_mode: DecodeMode,
}

impl ContractClient {
    pub fn new(ledger: Arc<dyn LedgerClient>, contract_id: impl Into<String>) -> Self {
        Self {
            ledger,
            contract_id: contract_id.into(),
            decode_mode: DecodeMode::default(),
        }
    }

    /// Decode return values with `mode` instead of the enum heuristic.
    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Encode `args` and build the call envelope.
    pub async fn prepare(&self, function: &str, args: &[TypedArg]) -> Result<TransactionEnvelope, InvokeError> {
        let wire_args = encode_args(args)?;
        self.ledger.call(&self.contract_id, function, wire_args).await
    }

    /// Simulate a read-only call and decode its return value.
    pub async fn simulate_call(&self, function: &str, args: &[TypedArg]) -> Result<TypedValue, InvokeError> {
        let envelope = self.prepare(function, args).await?;
        match self.ledger.simulate(&envelope).await? {
            SimulationResult::Success { retval } => {
                tracing::debug!(contract = %self.contract_id, function, kind = retval.tag_name(), "simulation succeeded");
                Ok(decode_with(&retval, self.decode_mode))
            }
            SimulationResult::Failure { error } => {
                tracing::warn!(contract = %self.contract_id, function, %error, "simulation failed");
                Err(InvokeError::Simulation(error))
            }
        }
    }

    /// Submit an envelope signed by the caller.
    pub async fn submit(&self, signed: &TransactionEnvelope) -> Result<SendTransactionResponse, InvokeError> {
        let resp = self.ledger.submit(signed).await?;
        tracing::info!(contract = %self.contract_id, hash = %resp.hash, status = %resp.status, "transaction submitted");
        Ok(resp)
    }
}

impl std::fmt::Debug for ContractClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractClient")
            .field("contract_id", &self.contract_id)
            .field("decode_mode", &self.decode_mode)
            .finish_non_exhaustive()
    }
}
