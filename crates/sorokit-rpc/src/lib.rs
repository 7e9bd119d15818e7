//! # sorokit-rpc
//!
//! Soroban RPC access for SoroKit:
//!
//! - [`SorobanRpcClient`]: JSON-RPC over HTTP (`getEvents`,
//!   `getLatestLedger`, `getHealth`, `simulateTransaction`,
//!   `sendTransaction`); implements [`sorokit_core::EventSource`] so it can
//!   feed an event poller directly
//! - [`LedgerClient`]: the seam for building and submitting transactions
//! - [`ContractClient`]: typed calls: encodes arguments, decodes results

pub mod client;
pub mod contract;
pub mod types;

pub use client::{events_params, RpcClientConfig, SorobanRpcClient};
pub use contract::{ContractClient, LedgerClient};
pub use types::{
    Health, LatestLedger, SendTransactionResponse, SimulateHostFunctionResult,
    SimulateTransactionResponse, SimulationResult, TransactionEnvelope,
};
