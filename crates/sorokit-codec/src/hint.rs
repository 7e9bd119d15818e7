//! Type hints accepted by the encoder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested wire kind for an encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    Bool,
    String,
    Symbol,
    Address,
    Bytes,
    Vec,
    Map,
    Enum,
    Timepoint,
    Duration,
}

impl TypeHint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::U128 => "u128",
            Self::I128 => "i128",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Address => "address",
            Self::Bytes => "bytes",
            Self::Vec => "vec",
            Self::Map => "map",
            Self::Enum => "enum",
            Self::Timepoint => "timepoint",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "u32" => Self::U32,
            "i32" => Self::I32,
            "u64" => Self::U64,
            "i64" => Self::I64,
            "u128" => Self::U128,
            "i128" => Self::I128,
            "bool" => Self::Bool,
            "string" => Self::String,
            "symbol" => Self::Symbol,
            "address" => Self::Address,
            "bytes" => Self::Bytes,
            "vec" => Self::Vec,
            "map" => Self::Map,
            "enum" => Self::Enum,
            "timepoint" => Self::Timepoint,
            "duration" => Self::Duration,
            other => return Err(format!("unknown type hint '{other}'")),
        })
    }
}
