//! Contract event records and the `getEvents` query surface.

use serde::{Deserialize, Deserializer, Serialize};

/// Event type string for contract-emitted events.
pub const EVENT_TYPE_CONTRACT: &str = "contract";

// ─── RawEvent ────────────────────────────────────────────────────────────────

/// A contract event exactly as returned by the remote `getEvents` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub ledger: u64,
    pub ledger_closed_at: String,
    #[serde(default)]
    pub contract_id: String,
    /// Base64 wire-encoded topics.
    #[serde(default)]
    pub topic: Vec<String>,
    /// Base64 wire-encoded value. Older nodes wrap it as `{ "xdr": "..." }`.
    #[serde(deserialize_with = "value_text")]
    pub value: String,
    /// Newer nodes drop the paging token; the event id doubles as the cursor.
    #[serde(default)]
    pub paging_token: String,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub in_successful_contract_call: bool,
}

fn value_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ValueField {
        Text(String),
        Wrapped { xdr: String },
    }
    Ok(match ValueField::deserialize(de)? {
        ValueField::Text(s) | ValueField::Wrapped { xdr: s } => s,
    })
}

// ─── EventRecord ─────────────────────────────────────────────────────────────

/// An event held by a poller. Created only from a [`RawEvent`]; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique key used for deduplication.
    pub id: String,
    pub kind: String,
    pub ledger_sequence: u64,
    /// ISO-8601 close time of the ledger.
    pub ledger_close_time: String,
    pub contract_id: String,
    /// Base64 wire-encoded topics, in emission order.
    pub topics: Vec<String>,
    /// Base64 wire-encoded event body.
    pub value: String,
    /// Opaque cursor; only meaningful through server ordering.
    pub cursor_token: String,
    pub transaction_hash: String,
    pub succeeded_in_call: bool,
}

impl From<RawEvent> for EventRecord {
    fn from(raw: RawEvent) -> Self {
        let cursor_token = if raw.paging_token.is_empty() {
            raw.id.clone()
        } else {
            raw.paging_token
        };
        Self {
            id: raw.id,
            kind: raw.kind,
            ledger_sequence: raw.ledger,
            ledger_close_time: raw.ledger_closed_at,
            contract_id: raw.contract_id,
            topics: raw.topic,
            value: raw.value,
            cursor_token,
            transaction_hash: raw.tx_hash,
            succeeded_in_call: raw.in_successful_contract_call,
        }
    }
}

// ─── Query types ─────────────────────────────────────────────────────────────

/// One filter clause of a `getEvents` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    #[serde(rename = "type")]
    pub kind: String,
    pub contract_ids: Vec<String>,
    /// Each inner list is one topic pattern; `"*"` matches any segment.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub topics: Option<Vec<Vec<String>>>,
}

impl EventFilter {
    /// Filter for events emitted by a single contract.
    pub fn contract(contract_id: impl Into<String>) -> Self {
        Self {
            kind: EVENT_TYPE_CONTRACT.into(),
            contract_ids: vec![contract_id.into()],
            topics: None,
        }
    }

    /// Restrict to the given topic patterns (no-op when empty).
    pub fn with_topics(mut self, topics: Vec<Vec<String>>) -> Self {
        self.topics = if topics.is_empty() { None } else { Some(topics) };
        self
    }
}

/// Parameters of a single event query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventsRequest {
    pub filters: Vec<EventFilter>,
    /// Exclusive cursor; `None` on the very first query.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cursor: Option<String>,
    pub limit: u32,
    /// Ledger to start from when no cursor is known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_ledger: Option<u64>,
}

/// Result page of an event query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventsResponse {
    pub events: Vec<RawEvent>,
    pub latest_ledger: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cursor: Option<String>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_json() -> serde_json::Value {
        json!({
            "type": "contract",
            "ledger": 1_234_567,
            "ledgerClosedAt": "2024-03-01T12:00:00Z",
            "contractId": "CCJZ5DGASBWQXR5MPFCJXMBI333XE5U3FSJTNQU7RIKE3P5GN2K2WYD5",
            "id": "0005302407856152576-0000000001",
            "pagingToken": "0005302407856152576-0000000001",
            "topic": ["AAAADwAAAAh0cmFuc2Zlcg=="],
            "value": "AAAAAwAAAAE=",
            "inSuccessfulContractCall": true,
            "txHash": "ab12"
        })
    }

    #[test]
    fn raw_event_maps_to_record() {
        let raw: RawEvent = serde_json::from_value(raw_json()).unwrap();
        let record = EventRecord::from(raw);
        assert_eq!(record.ledger_sequence, 1_234_567);
        assert_eq!(record.cursor_token, "0005302407856152576-0000000001");
        assert_eq!(record.topics.len(), 1);
        assert!(record.succeeded_in_call);
        assert_eq!(record.transaction_hash, "ab12");
    }

    #[test]
    fn wrapped_value_and_missing_paging_token() {
        let mut v = raw_json();
        v["value"] = json!({ "xdr": "AAAAAQ==" });
        v.as_object_mut().unwrap().remove("pagingToken");
        let record = EventRecord::from(serde_json::from_value::<RawEvent>(v).unwrap());
        assert_eq!(record.value, "AAAAAQ==");
        assert_eq!(record.cursor_token, record.id);
    }

    #[test]
    fn request_shape() {
        let req = GetEventsRequest {
            filters: vec![EventFilter::contract("CABC").with_topics(vec![vec!["*".into()]])],
            cursor: None,
            limit: 50,
            start_ledger: Some(100),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["filters"][0]["type"], "contract");
        assert_eq!(v["filters"][0]["contractIds"][0], "CABC");
        assert_eq!(v["filters"][0]["topics"][0][0], "*");
        assert!(v.get("cursor").is_none());
        assert_eq!(v["startLedger"], 100);
    }

    #[test]
    fn response_without_events_is_rejected() {
        let res = serde_json::from_value::<GetEventsResponse>(json!({ "latestLedger": 5 }));
        assert!(res.is_err());
    }
}
