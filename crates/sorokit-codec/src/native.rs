//! Application-side values handed to the encoder.
//!
//! `NativeValue` names each structural shape the encoder distinguishes.
//! Auto-detection inspects these shapes in a fixed priority order (see
//! [`crate::encoder`]), so the same input always lands on the same wire kind.

use std::fmt;

use crate::address::ScAddress;
use crate::hint::TypeHint;

/// A native application value.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Bool(bool),
    /// A plain floating-point number; integer-valued numbers encode as integers.
    Number(f64),
    /// A 128-bit-capable integer.
    BigInt(i128),
    Text(String),
    Bytes(Vec<u8>),
    Address(ScAddress),
    List(Vec<NativeValue>),
    /// Key/value entries in iteration order.
    Object(Vec<(String, NativeValue)>),
    /// A value carrying its own hint.
    Arg(Box<TypedArg>),
}

/// A value paired with an explicit hint, as used for call arguments and
/// the elements of vec/map/enum payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArg {
    pub value: NativeValue,
    pub hint: Option<TypeHint>,
}

impl TypedArg {
    pub fn new(value: impl Into<NativeValue>, hint: TypeHint) -> Self {
        Self {
            value: value.into(),
            hint: Some(hint),
        }
    }

    /// An argument whose wire kind is auto-detected.
    pub fn auto(value: impl Into<NativeValue>) -> Self {
        Self {
            value: value.into(),
            hint: None,
        }
    }
}

impl NativeValue {
    /// Wrap `value` so it encodes under `hint` wherever it appears.
    pub fn typed(value: impl Into<NativeValue>, hint: TypeHint) -> Self {
        Self::Arg(Box::new(TypedArg::new(value, hint)))
    }

    /// Build the `{ tag, values }` object accepted by the `enum` hint.
    pub fn enum_variant(tag: impl Into<String>, values: Vec<NativeValue>) -> Self {
        Self::Object(vec![
            ("tag".into(), Self::Text(tag.into())),
            ("values".into(), Self::List(values)),
        ])
    }

    /// Look up an entry of an `Object` by key.
    pub fn get(&self, key: &str) -> Option<&NativeValue> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short shape name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Address(_) => "address",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Arg(_) => "typed arg",
        }
    }

    /// Integer view of `Number` (when integer-valued) and `BigInt`.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::BigInt(n) => Some(*n),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 2f64.powi(127) => {
                Some(*n as i128)
            }
            _ => None,
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "{}", hex::encode(b)),
            Self::Address(a) => write!(f, "{a}"),
            Self::List(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Object(entries) => {
                let parts: Vec<_> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Arg(arg) => write!(f, "{}", arg.value),
        }
    }
}

impl From<bool> for NativeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for NativeValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<u32> for NativeValue {
    fn from(v: u32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<f64> for NativeValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for NativeValue {
    fn from(v: i64) -> Self {
        Self::BigInt(v as i128)
    }
}

impl From<u64> for NativeValue {
    fn from(v: u64) -> Self {
        Self::BigInt(v as i128)
    }
}

impl From<i128> for NativeValue {
    fn from(v: i128) -> Self {
        Self::BigInt(v)
    }
}

impl From<&str> for NativeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for NativeValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<ScAddress> for NativeValue {
    fn from(v: ScAddress) -> Self {
        Self::Address(v)
    }
}

impl From<TypedArg> for NativeValue {
    fn from(v: TypedArg) -> Self {
        Self::Arg(Box::new(v))
    }
}
