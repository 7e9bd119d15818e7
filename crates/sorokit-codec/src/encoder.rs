//! Native value → wire value encoder.
//!
//! With a hint the encoder honours it exactly, coercing the input
//! representation where the hint allows it. Without a hint the value's shape
//! is classified by [`detect`], which applies structural predicates in a
//! fixed priority:
//!
//! 1. boolean → `Bool`
//! 2. 128-bit-capable integer → `I128`
//! 3. integer-valued number → `I32` (widened to `I64`/`I128` out of range)
//! 4. text with address shape and a valid checksum → `Address`
//! 5. other text → `String`
//! 6. bytes → `Bytes`
//! 7. address object → `Address`
//! 8. list → `Vec`, elements encoded recursively in order
//! 9. object → `Map`, entries in iteration order, keys and values recursive
//! 10. anything else → `String` of its textual form

use sorokit_core::error::{EncodeError, InvokeError};

use crate::address::{has_address_shape, ScAddress};
use crate::hint::TypeHint;
use crate::int128::{split_i128, split_u128, split_u128_from_signed};
use crate::native::{NativeValue, TypedArg};
use crate::wire::WireValue;

/// Longest symbol the ledger accepts.
pub const MAX_SYMBOL_LEN: usize = 32;

/// Wire kind chosen by auto-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detected {
    Bool,
    I128,
    Integer,
    AddressText,
    String,
    Bytes,
    AddressObject,
    Vec,
    Map,
    /// Carries its own hint.
    Typed,
    Textual,
}

/// Classify a value for hint-less encoding.
pub fn detect(value: &NativeValue) -> Detected {
    let predicates: [(Detected, fn(&NativeValue) -> bool); 10] = [
        (Detected::Typed, |v| matches!(v, NativeValue::Arg(_))),
        (Detected::Bool, |v| matches!(v, NativeValue::Bool(_))),
        (Detected::I128, |v| matches!(v, NativeValue::BigInt(_))),
        (Detected::Integer, |v| {
            matches!(v, NativeValue::Number(_)) && v.as_integer().is_some()
        }),
        (Detected::AddressText, |v| {
            matches!(v, NativeValue::Text(s) if has_address_shape(s) && ScAddress::from_strkey(s).is_ok())
        }),
        (Detected::String, |v| matches!(v, NativeValue::Text(_))),
        (Detected::Bytes, |v| matches!(v, NativeValue::Bytes(_))),
        (Detected::AddressObject, |v| matches!(v, NativeValue::Address(_))),
        (Detected::Vec, |v| matches!(v, NativeValue::List(_))),
        (Detected::Map, |v| matches!(v, NativeValue::Object(_))),
    ];
    predicates
        .iter()
        .find(|(_, matches)| matches(value))
        .map(|(kind, _)| *kind)
        .unwrap_or(Detected::Textual)
}

/// Encode a native value, honouring `hint` when given.
pub fn encode(value: &NativeValue, hint: Option<TypeHint>) -> Result<WireValue, EncodeError> {
    match hint {
        Some(hint) => encode_hinted(value, hint),
        None => encode_auto(value),
    }
}

/// Encode contract call arguments in order.
pub fn encode_args(args: &[TypedArg]) -> Result<Vec<WireValue>, InvokeError> {
    args.iter()
        .enumerate()
        .map(|(index, arg)| {
            encode(&arg.value, arg.hint).map_err(|source| InvokeError::Encode { index, source })
        })
        .collect()
}

fn encode_auto(value: &NativeValue) -> Result<WireValue, EncodeError> {
    Ok(match (detect(value), value) {
        (Detected::Typed, NativeValue::Arg(arg)) => return encode(&arg.value, arg.hint),
        (Detected::Bool, NativeValue::Bool(b)) => WireValue::Bool(*b),
        (Detected::I128, NativeValue::BigInt(n)) => WireValue::I128(split_i128(*n)),
        (Detected::Integer, _) => {
            let n = value.as_integer().unwrap_or_default();
            if let Ok(v) = i32::try_from(n) {
                WireValue::I32(v)
            } else if let Ok(v) = i64::try_from(n) {
                WireValue::I64(v)
            } else {
                WireValue::I128(split_i128(n))
            }
        }
        (Detected::AddressText, NativeValue::Text(s)) => {
            WireValue::Address(ScAddress::from_strkey(s).map_err(|e| unsupported(TypeHint::Address, e))?)
        }
        (Detected::String, NativeValue::Text(s)) => {
            if has_address_shape(s) {
                tracing::debug!(text = %s, "address-shaped text failed strkey check; encoding as string");
            }
            WireValue::String(s.clone())
        }
        (Detected::Bytes, NativeValue::Bytes(b)) => WireValue::Bytes(b.clone()),
        (Detected::AddressObject, NativeValue::Address(a)) => WireValue::Address(*a),
        (Detected::Vec, NativeValue::List(items)) => {
            WireValue::Vec(items.iter().map(encode_auto).collect::<Result<_, _>>()?)
        }
        (Detected::Map, NativeValue::Object(entries)) => WireValue::Map(
            entries
                .iter()
                .map(|(k, v)| object_entry(k, v))
                .collect::<Result<_, _>>()?,
        ),
        _ => WireValue::String(value.to_string()),
    })
}

fn encode_hinted(value: &NativeValue, hint: TypeHint) -> Result<WireValue, EncodeError> {
    // The outer hint wins over one carried by the value itself.
    if let NativeValue::Arg(arg) = value {
        return encode_hinted(&arg.value, hint);
    }

    Ok(match hint {
        TypeHint::U32 => WireValue::U32(int_in_range(value, hint)?),
        TypeHint::I32 => WireValue::I32(int_in_range(value, hint)?),
        TypeHint::U64 => WireValue::U64(wide_int(value, hint)?),
        TypeHint::I64 => WireValue::I64(wide_int(value, hint)?),
        TypeHint::Timepoint => WireValue::Timepoint(int_in_range(value, hint)?),
        TypeHint::Duration => WireValue::Duration(int_in_range(value, hint)?),
        TypeHint::U128 => WireValue::U128(match value {
            NativeValue::Text(s) => split_u128(parse_decimal::<u128>(s, hint)?),
            _ => {
                let n = integer(value, hint)?;
                if n < 0 {
                    return Err(unsupported(hint, format!("{n} is negative")));
                }
                split_u128_from_signed(n)
            }
        }),
        TypeHint::I128 => WireValue::I128(split_i128(match value {
            NativeValue::Text(s) => parse_decimal::<i128>(s, hint)?,
            _ => integer(value, hint)?,
        })),
        TypeHint::Bool => match value {
            NativeValue::Bool(b) => WireValue::Bool(*b),
            other => return Err(mismatch(hint, other)),
        },
        TypeHint::String => match value {
            NativeValue::Text(s) => WireValue::String(s.clone()),
            other => WireValue::String(other.to_string()),
        },
        TypeHint::Symbol => match value {
            NativeValue::Text(s) => WireValue::Symbol(validate_symbol(s)?),
            other => return Err(mismatch(hint, other)),
        },
        TypeHint::Address => match value {
            NativeValue::Text(s) => {
                WireValue::Address(ScAddress::from_strkey(s).map_err(|e| unsupported(hint, format!("'{s}': {e}")))?)
            }
            NativeValue::Address(a) => WireValue::Address(*a),
            other => return Err(mismatch(hint, other)),
        },
        TypeHint::Bytes => match value {
            NativeValue::Bytes(b) => WireValue::Bytes(b.clone()),
            NativeValue::Text(s) => {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                WireValue::Bytes(
                    hex::decode(digits).map_err(|e| unsupported(hint, format!("not hex: {e}")))?,
                )
            }
            other => return Err(mismatch(hint, other)),
        },
        TypeHint::Vec => match value {
            NativeValue::List(items) => {
                WireValue::Vec(items.iter().map(encode_auto).collect::<Result<_, _>>()?)
            }
            other => return Err(mismatch(hint, other)),
        },
        TypeHint::Map => WireValue::Map(map_entries(value)?),
        TypeHint::Enum => {
            let tag = match value.get("tag") {
                Some(NativeValue::Text(tag)) => validate_symbol(tag)?,
                _ => return Err(unsupported(hint, "expected an object with a text 'tag'")),
            };
            let values = match value.get("values") {
                None => &[][..],
                Some(NativeValue::List(values)) => values.as_slice(),
                Some(other) => {
                    return Err(unsupported(hint, format!("'values' must be a list, got {}", other.kind())))
                }
            };
            let mut items = Vec::with_capacity(values.len() + 1);
            items.push(WireValue::Symbol(tag));
            for v in values {
                items.push(encode_auto(v)?);
            }
            WireValue::Vec(items)
        }
    })
}

fn map_entries(value: &NativeValue) -> Result<Vec<(WireValue, WireValue)>, EncodeError> {
    match value {
        NativeValue::List(pairs) => pairs
            .iter()
            .map(|pair| match pair {
                NativeValue::List(kv) if kv.len() == 2 => Ok((encode_auto(&kv[0])?, encode_auto(&kv[1])?)),
                other => Err(unsupported(
                    TypeHint::Map,
                    format!("expected [key, value] pairs, got {}", other.kind()),
                )),
            })
            .collect(),
        NativeValue::Object(entries) => entries
            .iter()
            .map(|(k, v)| object_entry(k, v))
            .collect(),
        other => Err(mismatch(TypeHint::Map, other)),
    }
}

fn object_entry(key: &str, value: &NativeValue) -> Result<(WireValue, WireValue), EncodeError> {
    Ok((encode_auto(&NativeValue::Text(key.to_string()))?, encode_auto(value)?))
}

fn integer(value: &NativeValue, hint: TypeHint) -> Result<i128, EncodeError> {
    value.as_integer().ok_or_else(|| mismatch(hint, value))
}

fn int_in_range<T: TryFrom<i128>>(value: &NativeValue, hint: TypeHint) -> Result<T, EncodeError> {
    let n = integer(value, hint)?;
    T::try_from(n).map_err(|_| unsupported(hint, format!("{n} is out of range")))
}

/// 64-bit hints also accept decimal text.
fn wide_int<T>(value: &NativeValue, hint: TypeHint) -> Result<T, EncodeError>
where
    T: TryFrom<i128> + std::str::FromStr,
{
    match value {
        NativeValue::Text(s) => parse_decimal(s, hint),
        _ => int_in_range(value, hint),
    }
}

fn parse_decimal<T: std::str::FromStr>(s: &str, hint: TypeHint) -> Result<T, EncodeError> {
    s.trim()
        .parse::<T>()
        .map_err(|_| unsupported(hint, format!("'{s}' is not a decimal integer in range")))
}

fn validate_symbol(s: &str) -> Result<String, EncodeError> {
    if s.len() > MAX_SYMBOL_LEN {
        return Err(unsupported(
            TypeHint::Symbol,
            format!("'{s}' is longer than {MAX_SYMBOL_LEN} characters"),
        ));
    }
    if let Some(c) = s.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(unsupported(TypeHint::Symbol, format!("'{s}' contains '{c}'")));
    }
    Ok(s.to_string())
}

fn mismatch(hint: TypeHint, value: &NativeValue) -> EncodeError {
    unsupported(hint, format!("cannot encode {} value", value.kind()))
}

fn unsupported(hint: TypeHint, reason: impl ToString) -> EncodeError {
    EncodeError::unsupported(hint.as_str(), reason.to_string())
}
