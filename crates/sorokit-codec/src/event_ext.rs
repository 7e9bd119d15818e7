//! Decoding helpers for event records.

use sorokit_core::error::WireFormatError;
use sorokit_core::event::EventRecord;

use crate::decoder::decode;
use crate::value::TypedValue;
use crate::wire::WireValue;

/// Decode the wire-encoded parts of an [`EventRecord`].
pub trait DecodeEventExt {
    fn topic_values(&self) -> Result<Vec<WireValue>, WireFormatError>;

    fn body_value(&self) -> Result<WireValue, WireFormatError>;

    /// Topics decoded to typed values.
    fn decode_topics(&self) -> Result<Vec<TypedValue>, WireFormatError> {
        Ok(self.topic_values()?.iter().map(decode).collect())
    }

    /// Event body decoded to a typed value.
    fn decode_value(&self) -> Result<TypedValue, WireFormatError> {
        Ok(decode(&self.body_value()?))
    }

    /// The first topic's symbol text, which by convention names the event.
    fn event_name(&self) -> Option<String> {
        self.topic_values()
            .ok()?
            .first()
            .and_then(|t| t.as_symbol().map(str::to_string))
    }
}

impl DecodeEventExt for EventRecord {
    fn topic_values(&self) -> Result<Vec<WireValue>, WireFormatError> {
        self.topics.iter().map(|t| WireValue::from_base64(t)).collect()
    }

    fn body_value(&self) -> Result<WireValue, WireFormatError> {
        WireValue::from_base64(&self.value)
    }
}
