//! Wire value → typed value decoder.
//!
//! Decoding is total: every `WireValue` produces a `TypedValue`. Wire kinds
//! with no typed counterpart (256-bit integers, errors, ledger keys) decode
//! to their textual form.

use crate::int128::{join_i128, join_u128};
use crate::value::TypedValue;
use crate::wire::WireValue;

/// How wire vecs are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// A vec whose first element is a symbol decodes as an enum.
    #[default]
    EnumHeuristic,
    /// Vecs always decode as plain sequences.
    RawSequence,
}

/// Decode with the default enum heuristic.
pub fn decode(wire: &WireValue) -> TypedValue {
    decode_with(wire, DecodeMode::EnumHeuristic)
}

/// Decode with an explicit vec interpretation.
pub fn decode_with(wire: &WireValue, mode: DecodeMode) -> TypedValue {
    match wire {
        WireValue::Bool(b) => TypedValue::Bool(*b),
        WireValue::Void => TypedValue::Void,
        WireValue::U32(v) => TypedValue::U32(*v),
        WireValue::I32(v) => TypedValue::I32(*v),
        WireValue::U64(v) => TypedValue::U64(*v),
        WireValue::I64(v) => TypedValue::I64(*v),
        WireValue::Timepoint(v) => TypedValue::Timepoint(*v),
        WireValue::Duration(v) => TypedValue::Duration(*v),
        WireValue::U128(parts) => TypedValue::U128(join_u128(*parts)),
        WireValue::I128(parts) => TypedValue::I128(join_i128(*parts)),
        WireValue::Bytes(b) => TypedValue::Bytes(b.clone()),
        WireValue::String(s) => TypedValue::String(s.clone()),
        WireValue::Symbol(s) => TypedValue::Symbol(s.clone()),
        WireValue::Address(a) => TypedValue::Address(a.to_strkey()),
        WireValue::Vec(items) => match (mode, items.split_first()) {
            (DecodeMode::EnumHeuristic, Some((WireValue::Symbol(tag), rest))) => TypedValue::Enum {
                tag: tag.clone(),
                values: rest.iter().map(|v| decode_with(v, mode)).collect(),
            },
            _ => TypedValue::Vec(items.iter().map(|v| decode_with(v, mode)).collect()),
        },
        WireValue::Map(entries) => TypedValue::Map(
            entries
                .iter()
                .map(|(k, v)| (decode_with(k, mode), decode_with(v, mode)))
                .collect(),
        ),
        other @ (WireValue::Error { .. }
        | WireValue::U256(_)
        | WireValue::I256(_)
        | WireValue::LedgerKeyContractInstance
        | WireValue::LedgerKeyNonce(_)) => {
            tracing::trace!(tag = other.tag_name(), "decoding unsupported wire kind as text");
            TypedValue::String(other.to_string())
        }
    }
}
