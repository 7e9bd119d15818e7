//! The wire value model exchanged with the remote execution service.
//!
//! `WireValue` mirrors the ledger's `ScVal` union. Integers wider than 64
//! bits travel as explicit halves so no step ever needs a native 128/256-bit
//! wire integer.

use std::fmt;

use crate::address::ScAddress;

/// Unsigned 128-bit integer as two unsigned 64-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UInt128Parts {
    pub hi: u64,
    pub lo: u64,
}

/// Signed 128-bit integer; `hi` carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int128Parts {
    pub hi: i64,
    pub lo: u64,
}

/// Unsigned 256-bit integer, most significant quarter first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UInt256Parts {
    pub hi_hi: u64,
    pub hi_lo: u64,
    pub lo_hi: u64,
    pub lo_lo: u64,
}

/// Signed 256-bit integer; `hi_hi` carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int256Parts {
    pub hi_hi: i64,
    pub hi_lo: u64,
    pub lo_hi: u64,
    pub lo_lo: u64,
}

/// A typed wire value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireValue {
    Bool(bool),
    Void,
    /// Host or contract error; `kind` 0 is a contract-defined code.
    Error { kind: u32, code: u32 },
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Timepoint(u64),
    Duration(u64),
    U128(UInt128Parts),
    I128(Int128Parts),
    U256(UInt256Parts),
    I256(Int256Parts),
    Bytes(Vec<u8>),
    String(String),
    Symbol(String),
    Vec(Vec<WireValue>),
    Map(Vec<(WireValue, WireValue)>),
    Address(ScAddress),
    LedgerKeyContractInstance,
    LedgerKeyNonce(i64),
}

impl WireValue {
    /// Name of the wire tag, as used in hints and diagnostics.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Void => "void",
            Self::Error { .. } => "error",
            Self::U32(_) => "u32",
            Self::I32(_) => "i32",
            Self::U64(_) => "u64",
            Self::I64(_) => "i64",
            Self::Timepoint(_) => "timepoint",
            Self::Duration(_) => "duration",
            Self::U128(_) => "u128",
            Self::I128(_) => "i128",
            Self::U256(_) => "u256",
            Self::I256(_) => "i256",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Vec(_) => "vec",
            Self::Map(_) => "map",
            Self::Address(_) => "address",
            Self::LedgerKeyContractInstance => "ledger_key_contract_instance",
            Self::LedgerKeyNonce(_) => "ledger_key_nonce",
        }
    }

    /// Returns the symbol text if this is a `Symbol`.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Void => write!(f, "void"),
            Self::Error { kind, code } => write!(f, "Error({kind}, {code})"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U64(v) | Self::Timepoint(v) | Self::Duration(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U128(p) => write!(f, "{}", crate::int128::join_u128(*p)),
            Self::I128(p) => write!(f, "{}", crate::int128::join_i128(*p)),
            Self::U256(p) => write!(
                f,
                "0x{:016x}{:016x}{:016x}{:016x}",
                p.hi_hi, p.hi_lo, p.lo_hi, p.lo_lo
            ),
            Self::I256(p) => write!(
                f,
                "0x{:016x}{:016x}{:016x}{:016x}",
                p.hi_hi as u64, p.hi_lo, p.lo_hi, p.lo_lo
            ),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::String(s) => write!(f, "{s}"),
            Self::Symbol(s) => write!(f, "{s}"),
            Self::Vec(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(entries) => {
                let parts: Vec<_> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Address(a) => write!(f, "{a}"),
            Self::LedgerKeyContractInstance => write!(f, "LedgerKeyContractInstance"),
            Self::LedgerKeyNonce(n) => write!(f, "LedgerKeyNonce({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_large_ints() {
        let v = WireValue::I128(crate::int128::split_i128(-5));
        assert_eq!(v.to_string(), "-5");
        let u = WireValue::U256(UInt256Parts { hi_hi: 0, hi_lo: 0, lo_hi: 0, lo_lo: 255 });
        assert_eq!(u.to_string(), format!("0x{}ff", "0".repeat(62)));
    }

    #[test]
    fn display_composites() {
        let v = WireValue::Vec(vec![
            WireValue::symbol("Transfer"),
            WireValue::Map(vec![(WireValue::U32(1), WireValue::Bool(true))]),
        ]);
        assert_eq!(v.to_string(), "[Transfer, {1: true}]");
    }
}
