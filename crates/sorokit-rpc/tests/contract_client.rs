//! `ContractClient` against an in-memory ledger client.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sorokit_codec::int128::split_u128;
use sorokit_codec::{DecodeMode, TypeHint, TypedArg, TypedValue, WireValue};
use sorokit_core::error::{InvokeError, TransportError};
use sorokit_rpc::{
    ContractClient, LedgerClient, SendTransactionResponse, SimulationResult, TransactionEnvelope,
};

const TOKEN: &str = "CAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6N4O";
const HOLDER: &str = "GAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB7JZX";

#[derive(Default)]
struct MockLedger {
    calls: Mutex<Vec<(String, String, Vec<WireValue>)>>,
    reply: Mutex<Option<Result<SimulationResult, InvokeError>>>,
}

impl MockLedger {
    fn replying(reply: Result<SimulationResult, InvokeError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            reply: Mutex::new(Some(reply)),
        })
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn call(
        &self,
        contract_id: &str,
        function: &str,
        args: Vec<WireValue>,
    ) -> Result<TransactionEnvelope, InvokeError> {
        self.calls
            .lock()
            .unwrap()
            .push((contract_id.to_string(), function.to_string(), args));
        Ok(TransactionEnvelope::new(format!("envelope:{function}")))
    }

    async fn simulate(&self, envelope: &TransactionEnvelope) -> Result<SimulationResult, InvokeError> {
        assert!(envelope.as_str().starts_with("envelope:"));
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(TransportError::Other("no reply scripted".into()).into()))
    }

    async fn submit(&self, signed: &TransactionEnvelope) -> Result<SendTransactionResponse, InvokeError> {
        Ok(SendTransactionResponse {
            hash: format!("hash-of-{}", signed.as_str()),
            status: "PENDING".into(),
            latest_ledger: 42,
            error_result_xdr: None,
        })
    }
}

#[tokio::test]
async fn simulate_call_encodes_args_and_decodes_result() {
    let ledger = MockLedger::replying(Ok(SimulationResult::Success {
        retval: WireValue::I128(sorokit_codec::int128::split_i128(1_000_000)),
    }));
    let client = ContractClient::new(ledger.clone(), TOKEN);

    let balance = client
        .simulate_call("balance", &[TypedArg::auto(HOLDER)])
        .await
        .unwrap();
    assert_eq!(balance, TypedValue::I128(1_000_000));

    let calls = ledger.calls.lock().unwrap();
    let (contract, function, args) = &calls[0];
    assert_eq!(contract, TOKEN);
    assert_eq!(function, "balance");
    assert!(matches!(args[0], WireValue::Address(_)));
}

#[tokio::test]
async fn hinted_args_reach_the_ledger() {
    let ledger = MockLedger::replying(Ok(SimulationResult::Success {
        retval: WireValue::Void,
    }));
    let client = ContractClient::new(ledger.clone(), TOKEN);

    let out = client
        .simulate_call(
            "transfer",
            &[
                TypedArg::new(HOLDER, TypeHint::Address),
                TypedArg::new(TOKEN, TypeHint::Address),
                TypedArg::new(500, TypeHint::U128),
            ],
        )
        .await
        .unwrap();
    assert!(out.is_void());
    let calls = ledger.calls.lock().unwrap();
    assert_eq!(calls[0].2[2], WireValue::U128(split_u128(500)));
}

#[tokio::test]
async fn encode_failure_names_the_argument() {
    let ledger = Arc::new(MockLedger::default());
    let client = ContractClient::new(ledger.clone(), TOKEN);

    let err = client
        .simulate_call("approve", &[TypedArg::auto(HOLDER), TypedArg::new("-5", TypeHint::U128)])
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::Encode { index: 1, .. }));
    assert!(ledger.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn simulation_failure_surfaces() {
    let ledger = MockLedger::replying(Ok(SimulationResult::Failure {
        error: "HostError: Error(Contract, #10)".into(),
    }));
    let client = ContractClient::new(ledger, TOKEN);

    let err = client.simulate_call("mint", &[]).await.unwrap_err();
    assert_eq!(err, InvokeError::Simulation("HostError: Error(Contract, #10)".into()));
}

#[tokio::test]
async fn raw_sequence_mode_keeps_symbol_vec() {
    let retval = WireValue::Vec(vec![WireValue::symbol("a"), WireValue::symbol("b")]);
    let ledger = MockLedger::replying(Ok(SimulationResult::Success { retval: retval.clone() }));
    let client = ContractClient::new(ledger, TOKEN).with_decode_mode(DecodeMode::RawSequence);

    assert_eq!(
        client.simulate_call("names", &[]).await.unwrap(),
        TypedValue::Vec(vec![TypedValue::Symbol("a".into()), TypedValue::Symbol("b".into())])
    );
}

#[tokio::test]
async fn submit_passes_through() {
    let client = ContractClient::new(Arc::new(MockLedger::default()), TOKEN);
    let resp = client.submit(&TransactionEnvelope::new("signed")).await.unwrap();
    assert!(resp.is_accepted());
    assert_eq!(resp.hash, "hash-of-signed");
}
