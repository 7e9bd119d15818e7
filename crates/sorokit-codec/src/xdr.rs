//! Binary wire form of `WireValue` (XDR `ScVal` layout) and its base64 text.
//!
//! Big-endian, every item padded to a 4-byte boundary. Variable-length
//! opaque data is `len: u32 ‖ bytes ‖ zero padding`. Vecs and maps are
//! optional pointers: a `u32` presence flag precedes the element count.

use bytes::{Buf, BufMut, BytesMut};
use data_encoding::BASE64;
use sorokit_core::error::WireFormatError;

use crate::address::ScAddress;
use crate::wire::{Int128Parts, Int256Parts, UInt128Parts, UInt256Parts, WireValue};

/// Maximum vec/map nesting accepted when reading.
pub const MAX_DEPTH: usize = 128;

mod tag {
    pub const BOOL: u32 = 0;
    pub const VOID: u32 = 1;
    pub const ERROR: u32 = 2;
    pub const U32: u32 = 3;
    pub const I32: u32 = 4;
    pub const U64: u32 = 5;
    pub const I64: u32 = 6;
    pub const TIMEPOINT: u32 = 7;
    pub const DURATION: u32 = 8;
    pub const U128: u32 = 9;
    pub const I128: u32 = 10;
    pub const U256: u32 = 11;
    pub const I256: u32 = 12;
    pub const BYTES: u32 = 13;
    pub const STRING: u32 = 14;
    pub const SYMBOL: u32 = 15;
    pub const VEC: u32 = 16;
    pub const MAP: u32 = 17;
    pub const ADDRESS: u32 = 18;
    pub const LEDGER_KEY_CONTRACT_INSTANCE: u32 = 20;
    pub const LEDGER_KEY_NONCE: u32 = 21;
}

const ADDRESS_ACCOUNT: u32 = 0;
const ADDRESS_CONTRACT: u32 = 1;
const PUBLIC_KEY_ED25519: u32 = 0;

impl WireValue {
    /// Serialize to XDR bytes.
    pub fn to_xdr(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(16);
        write_value(&mut buf, self);
        buf.to_vec()
    }

    /// Parse XDR bytes; the input must hold exactly one value.
    pub fn from_xdr(bytes: &[u8]) -> Result<Self, WireFormatError> {
        let mut reader = bytes;
        let value = read_value(&mut reader, 0)?;
        if reader.has_remaining() {
            return Err(WireFormatError::TrailingBytes {
                count: reader.remaining(),
            });
        }
        Ok(value)
    }

    /// Serialize to base64 text, the form used in RPC payloads.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.to_xdr())
    }

    /// Parse base64 text.
    pub fn from_base64(text: &str) -> Result<Self, WireFormatError> {
        let bytes = BASE64
            .decode(text.trim().as_bytes())
            .map_err(|e| WireFormatError::Base64(e.to_string()))?;
        Self::from_xdr(&bytes)
    }
}

// ─── Writing ─────────────────────────────────────────────────────────────────

fn write_value(buf: &mut BytesMut, value: &WireValue) {
    match value {
        WireValue::Bool(b) => {
            buf.put_u32(tag::BOOL);
            buf.put_u32(u32::from(*b));
        }
        WireValue::Void => buf.put_u32(tag::VOID),
        WireValue::Error { kind, code } => {
            buf.put_u32(tag::ERROR);
            buf.put_u32(*kind);
            buf.put_u32(*code);
        }
        WireValue::U32(v) => {
            buf.put_u32(tag::U32);
            buf.put_u32(*v);
        }
        WireValue::I32(v) => {
            buf.put_u32(tag::I32);
            buf.put_i32(*v);
        }
        WireValue::U64(v) => {
            buf.put_u32(tag::U64);
            buf.put_u64(*v);
        }
        WireValue::I64(v) => {
            buf.put_u32(tag::I64);
            buf.put_i64(*v);
        }
        WireValue::Timepoint(v) => {
            buf.put_u32(tag::TIMEPOINT);
            buf.put_u64(*v);
        }
        WireValue::Duration(v) => {
            buf.put_u32(tag::DURATION);
            buf.put_u64(*v);
        }
        WireValue::U128(p) => {
            buf.put_u32(tag::U128);
            buf.put_u64(p.hi);
            buf.put_u64(p.lo);
        }
        WireValue::I128(p) => {
            buf.put_u32(tag::I128);
            buf.put_i64(p.hi);
            buf.put_u64(p.lo);
        }
        WireValue::U256(p) => {
            buf.put_u32(tag::U256);
            buf.put_u64(p.hi_hi);
            buf.put_u64(p.hi_lo);
            buf.put_u64(p.lo_hi);
            buf.put_u64(p.lo_lo);
        }
        WireValue::I256(p) => {
            buf.put_u32(tag::I256);
            buf.put_i64(p.hi_hi);
            buf.put_u64(p.hi_lo);
            buf.put_u64(p.lo_hi);
            buf.put_u64(p.lo_lo);
        }
        WireValue::Bytes(b) => {
            buf.put_u32(tag::BYTES);
            write_opaque(buf, b);
        }
        WireValue::String(s) => {
            buf.put_u32(tag::STRING);
            write_opaque(buf, s.as_bytes());
        }
        WireValue::Symbol(s) => {
            buf.put_u32(tag::SYMBOL);
            write_opaque(buf, s.as_bytes());
        }
        WireValue::Vec(items) => {
            buf.put_u32(tag::VEC);
            buf.put_u32(1);
            buf.put_u32(items.len() as u32);
            for item in items {
                write_value(buf, item);
            }
        }
        WireValue::Map(entries) => {
            buf.put_u32(tag::MAP);
            buf.put_u32(1);
            buf.put_u32(entries.len() as u32);
            for (k, v) in entries {
                write_value(buf, k);
                write_value(buf, v);
            }
        }
        WireValue::Address(addr) => {
            buf.put_u32(tag::ADDRESS);
            match addr {
                ScAddress::Account(key) => {
                    buf.put_u32(ADDRESS_ACCOUNT);
                    buf.put_u32(PUBLIC_KEY_ED25519);
                    buf.put_slice(key);
                }
                ScAddress::Contract(hash) => {
                    buf.put_u32(ADDRESS_CONTRACT);
                    buf.put_slice(hash);
                }
            }
        }
        WireValue::LedgerKeyContractInstance => buf.put_u32(tag::LEDGER_KEY_CONTRACT_INSTANCE),
        WireValue::LedgerKeyNonce(n) => {
            buf.put_u32(tag::LEDGER_KEY_NONCE);
            buf.put_i64(*n);
        }
    }
}

fn write_opaque(buf: &mut BytesMut, data: &[u8]) {
    buf.put_u32(data.len() as u32);
    buf.put_slice(data);
    buf.put_bytes(0, padding(data.len()));
}

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

// ─── Reading ─────────────────────────────────────────────────────────────────

fn read_value(r: &mut &[u8], depth: usize) -> Result<WireValue, WireFormatError> {
    if depth > MAX_DEPTH {
        return Err(WireFormatError::TooDeep { max: MAX_DEPTH });
    }
    let discriminant = read_u32(r)?;
    Ok(match discriminant {
        tag::BOOL => match read_u32(r)? {
            0 => WireValue::Bool(false),
            1 => WireValue::Bool(true),
            other => {
                return Err(WireFormatError::UnknownDiscriminant {
                    what: "bool",
                    value: other,
                })
            }
        },
        tag::VOID => WireValue::Void,
        tag::ERROR => WireValue::Error {
            kind: read_u32(r)?,
            code: read_u32(r)?,
        },
        tag::U32 => WireValue::U32(read_u32(r)?),
        tag::I32 => {
            need(r, 4)?;
            WireValue::I32(r.get_i32())
        }
        tag::U64 => WireValue::U64(read_u64(r)?),
        tag::I64 => WireValue::I64(read_i64(r)?),
        tag::TIMEPOINT => WireValue::Timepoint(read_u64(r)?),
        tag::DURATION => WireValue::Duration(read_u64(r)?),
        tag::U128 => WireValue::U128(UInt128Parts {
            hi: read_u64(r)?,
            lo: read_u64(r)?,
        }),
        tag::I128 => WireValue::I128(Int128Parts {
            hi: read_i64(r)?,
            lo: read_u64(r)?,
        }),
        tag::U256 => WireValue::U256(UInt256Parts {
            hi_hi: read_u64(r)?,
            hi_lo: read_u64(r)?,
            lo_hi: read_u64(r)?,
            lo_lo: read_u64(r)?,
        }),
        tag::I256 => WireValue::I256(Int256Parts {
            hi_hi: read_i64(r)?,
            hi_lo: read_u64(r)?,
            lo_hi: read_u64(r)?,
            lo_lo: read_u64(r)?,
        }),
        tag::BYTES => WireValue::Bytes(read_opaque(r)?),
        tag::STRING => WireValue::String(read_text(r, "string")?),
        tag::SYMBOL => WireValue::Symbol(read_text(r, "symbol")?),
        tag::VEC => {
            let mut items = Vec::new();
            if read_present(r)? {
                let count = read_count(r)?;
                items.reserve(count);
                for _ in 0..count {
                    items.push(read_value(r, depth + 1)?);
                }
            }
            WireValue::Vec(items)
        }
        tag::MAP => {
            let mut entries = Vec::new();
            if read_present(r)? {
                let count = read_count(r)?;
                entries.reserve(count);
                for _ in 0..count {
                    let k = read_value(r, depth + 1)?;
                    let v = read_value(r, depth + 1)?;
                    entries.push((k, v));
                }
            }
            WireValue::Map(entries)
        }
        tag::ADDRESS => WireValue::Address(match read_u32(r)? {
            ADDRESS_ACCOUNT => match read_u32(r)? {
                PUBLIC_KEY_ED25519 => ScAddress::Account(read_key(r)?),
                other => {
                    return Err(WireFormatError::UnknownDiscriminant {
                        what: "public key type",
                        value: other,
                    })
                }
            },
            ADDRESS_CONTRACT => ScAddress::Contract(read_key(r)?),
            other => {
                return Err(WireFormatError::UnknownDiscriminant {
                    what: "address type",
                    value: other,
                })
            }
        }),
        tag::LEDGER_KEY_CONTRACT_INSTANCE => WireValue::LedgerKeyContractInstance,
        tag::LEDGER_KEY_NONCE => WireValue::LedgerKeyNonce(read_i64(r)?),
        other if other < 32 => return Err(WireFormatError::UnsupportedTag { tag: other }),
        other => {
            return Err(WireFormatError::UnknownDiscriminant {
                what: "value tag",
                value: other,
            })
        }
    })
}

fn need(r: &&[u8], n: usize) -> Result<(), WireFormatError> {
    if r.remaining() < n {
        return Err(WireFormatError::UnexpectedEof {
            needed: n,
            remaining: r.remaining(),
        });
    }
    Ok(())
}

fn read_u32(r: &mut &[u8]) -> Result<u32, WireFormatError> {
    need(r, 4)?;
    Ok(r.get_u32())
}

fn read_u64(r: &mut &[u8]) -> Result<u64, WireFormatError> {
    need(r, 8)?;
    Ok(r.get_u64())
}

fn read_i64(r: &mut &[u8]) -> Result<i64, WireFormatError> {
    need(r, 8)?;
    Ok(r.get_i64())
}

fn read_present(r: &mut &[u8]) -> Result<bool, WireFormatError> {
    match read_u32(r)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(WireFormatError::UnknownDiscriminant {
            what: "optional flag",
            value: other,
        }),
    }
}

/// Element count, bounded by the bytes left so a corrupt length cannot
/// trigger a huge allocation. Every element takes at least 4 bytes.
fn read_count(r: &mut &[u8]) -> Result<usize, WireFormatError> {
    let count = read_u32(r)? as usize;
    need(r, count.saturating_mul(4))?;
    Ok(count)
}

fn read_opaque(r: &mut &[u8]) -> Result<Vec<u8>, WireFormatError> {
    let len = read_u32(r)? as usize;
    let pad = padding(len);
    need(r, len + pad)?;
    let data = r[..len].to_vec();
    r.advance(len);
    if r[..pad].iter().any(|b| *b != 0) {
        return Err(WireFormatError::InvalidPadding);
    }
    r.advance(pad);
    Ok(data)
}

fn read_text(r: &mut &[u8], what: &'static str) -> Result<String, WireFormatError> {
    String::from_utf8(read_opaque(r)?).map_err(|_| WireFormatError::InvalidUtf8 { what })
}

fn read_key(r: &mut &[u8]) -> Result<[u8; 32], WireFormatError> {
    need(r, 32)?;
    let mut key = [0u8; 32];
    r.copy_to_slice(&mut key);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int128::{split_i128, split_u128};

    #[test]
    fn golden_symbol() {
        let v = WireValue::symbol("transfer");
        assert_eq!(v.to_base64(), "AAAADwAAAAh0cmFuc2Zlcg==");
        assert_eq!(WireValue::from_base64("AAAADwAAAAh0cmFuc2Zlcg==").unwrap(), v);
    }

    #[test]
    fn golden_u32() {
        assert_eq!(WireValue::U32(1).to_base64(), "AAAAAwAAAAE=");
    }

    #[test]
    fn golden_i128_minus_one() {
        let v = WireValue::I128(split_i128(-1));
        assert_eq!(v.to_base64(), "AAAACv////////////////////8=");
    }

    #[test]
    fn golden_enum_vec() {
        let v = WireValue::Vec(vec![
            WireValue::symbol("Transfer"),
            WireValue::U128(split_u128(500)),
        ]);
        assert_eq!(
            v.to_base64(),
            "AAAAEAAAAAEAAAACAAAADwAAAAhUcmFuc2ZlcgAAAAkAAAAAAAAAAAAAAAAAAAH0"
        );
    }

    #[test]
    fn string_is_padded() {
        let bytes = WireValue::String("hello".into()).to_xdr();
        assert_eq!(bytes.len(), 4 + 4 + 8);
        assert_eq!(&bytes[13..], &[0, 0, 0]);
        assert_eq!(
            WireValue::from_base64("AAAADgAAAAVoZWxsbwAAAA==").unwrap(),
            WireValue::String("hello".into())
        );
    }

    #[test]
    fn address_roundtrip() {
        let key: [u8; 32] = std::array::from_fn(|i| i as u8);
        for addr in [ScAddress::Account(key), ScAddress::Contract(key)] {
            let v = WireValue::Address(addr);
            assert_eq!(WireValue::from_xdr(&v.to_xdr()).unwrap(), v);
        }
    }

    #[test]
    fn nested_map_roundtrip() {
        let v = WireValue::Map(vec![(
            WireValue::symbol("items"),
            WireValue::Vec(vec![WireValue::Bytes(vec![1, 2, 3]), WireValue::Void]),
        )]);
        assert_eq!(WireValue::from_xdr(&v.to_xdr()).unwrap(), v);
    }

    #[test]
    fn absent_vec_reads_as_empty() {
        let bytes = [0, 0, 0, 16, 0, 0, 0, 0];
        assert_eq!(WireValue::from_xdr(&bytes).unwrap(), WireValue::Vec(vec![]));
    }

    #[test]
    fn truncated_input() {
        let bytes = WireValue::U64(9).to_xdr();
        let err = WireValue::from_xdr(&bytes[..6]).unwrap_err();
        assert!(matches!(err, WireFormatError::UnexpectedEof { needed: 8, remaining: 2 }));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = WireValue::Void.to_xdr();
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        assert_eq!(
            WireValue::from_xdr(&bytes),
            Err(WireFormatError::TrailingBytes { count: 4 })
        );
    }

    #[test]
    fn contract_instance_tag_unsupported() {
        let bytes = [0, 0, 0, 19];
        assert_eq!(
            WireValue::from_xdr(&bytes),
            Err(WireFormatError::UnsupportedTag { tag: 19 })
        );
    }

    #[test]
    fn bad_base64() {
        assert!(matches!(
            WireValue::from_base64("not base64!"),
            Err(WireFormatError::Base64(_))
        ));
    }

    #[test]
    fn corrupt_count_does_not_allocate() {
        let bytes = [0, 0, 0, 16, 0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff];
        assert!(matches!(
            WireValue::from_xdr(&bytes),
            Err(WireFormatError::UnexpectedEof { .. })
        ));
    }
}
