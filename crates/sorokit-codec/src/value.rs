//! Decoded, typed values.

use std::fmt;

use serde::{Deserialize, Serialize};
use sorokit_core::error::EncodeError;

use crate::address::ScAddress;
use crate::int128::{split_i128, split_u128};
use crate::wire::WireValue;

/// A decoded value with its wire kind made explicit.
///
/// This is also the explicit constructor path into the wire format: every
/// variant maps to exactly one wire shape via [`TypedValue::to_wire`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    String(String),
    Symbol(String),
    /// Canonical strkey text.
    Address(String),
    Bytes(Vec<u8>),
    Vec(Vec<TypedValue>),
    Map(Vec<(TypedValue, TypedValue)>),
    Enum { tag: String, values: Vec<TypedValue> },
    Timepoint(u64),
    Duration(u64),
    Void,
}

impl TypedValue {
    /// Build the wire value for this typed value.
    ///
    /// Fails only for an `Address` whose text is not a valid strkey.
    pub fn to_wire(&self) -> Result<WireValue, EncodeError> {
        Ok(match self {
            Self::Bool(b) => WireValue::Bool(*b),
            Self::I32(v) => WireValue::I32(*v),
            Self::U32(v) => WireValue::U32(*v),
            Self::I64(v) => WireValue::I64(*v),
            Self::U64(v) => WireValue::U64(*v),
            Self::I128(v) => WireValue::I128(split_i128(*v)),
            Self::U128(v) => WireValue::U128(split_u128(*v)),
            Self::String(s) => WireValue::String(s.clone()),
            Self::Symbol(s) => WireValue::Symbol(s.clone()),
            Self::Address(s) => WireValue::Address(
                ScAddress::from_strkey(s)
                    .map_err(|e| EncodeError::unsupported("address", format!("'{s}': {e}")))?,
            ),
            Self::Bytes(b) => WireValue::Bytes(b.clone()),
            Self::Vec(items) => {
                WireValue::Vec(items.iter().map(Self::to_wire).collect::<Result<_, _>>()?)
            }
            Self::Map(entries) => WireValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.to_wire()?, v.to_wire()?)))
                    .collect::<Result<_, EncodeError>>()?,
            ),
            Self::Enum { tag, values } => {
                let mut items = Vec::with_capacity(values.len() + 1);
                items.push(WireValue::Symbol(tag.clone()));
                for v in values {
                    items.push(v.to_wire()?);
                }
                WireValue::Vec(items)
            }
            Self::Timepoint(v) => WireValue::Timepoint(*v),
            Self::Duration(v) => WireValue::Duration(*v),
            Self::Void => WireValue::Void,
        })
    }

    /// Integer view across every integer kind that fits in an `i128`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::I32(v) => Some(*v as i128),
            Self::U32(v) => Some(*v as i128),
            Self::I64(v) => Some(*v as i128),
            Self::U64(v) | Self::Timepoint(v) | Self::Duration(v) => Some(*v as i128),
            Self::I128(v) => Some(*v),
            Self::U128(v) => i128::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Text of a `String`, `Symbol` or `Address`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Symbol(s) | Self::Address(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) | Self::Timepoint(v) | Self::Duration(v) => write!(f, "{v}"),
            Self::I128(v) => write!(f, "{v}"),
            Self::U128(v) => write!(f, "{v}"),
            Self::String(s) | Self::Symbol(s) | Self::Address(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::Vec(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(entries) => {
                let parts: Vec<_> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Enum { tag, values } => {
                let parts: Vec<_> = values.iter().map(|x| x.to_string()).collect();
                write!(f, "{tag}({})", parts.join(", "))
            }
            Self::Void => write!(f, "void"),
        }
    }
}
