//! Splitting 128-bit integers into 64-bit halves and joining them back.
//!
//! `lo = n & (2^64 - 1)`, `hi = n >> 64`. The shift is arithmetic for signed
//! values so `hi` carries the sign; the halves together are the value's
//! two's-complement bit pattern.

use crate::wire::{Int128Parts, UInt128Parts};

const MASK64: i128 = u64::MAX as i128;

/// Split a signed 128-bit integer.
pub fn split_i128(n: i128) -> Int128Parts {
    Int128Parts {
        hi: (n >> 64) as i64,
        lo: (n & MASK64) as u64,
    }
}

/// Split an unsigned 128-bit integer.
pub fn split_u128(n: u128) -> UInt128Parts {
    UInt128Parts {
        hi: (n >> 64) as u64,
        lo: n as u64,
    }
}

/// Split an unsigned value that arrives in a signed carrier.
///
/// The unsigned `hi` half cannot hold a negative pattern, so a negative
/// shifted `hi` is normalised by adding 2^64.
pub fn split_u128_from_signed(n: i128) -> UInt128Parts {
    let mut hi = n >> 64;
    if hi < 0 {
        hi += 1i128 << 64;
    }
    UInt128Parts {
        hi: hi as u64,
        lo: (n & MASK64) as u64,
    }
}

/// Join signed halves; the sign comes from `hi`.
pub fn join_i128(parts: Int128Parts) -> i128 {
    ((parts.hi as i128) << 64) | ((parts.lo as i128) & MASK64)
}

/// Join unsigned halves.
pub fn join_u128(parts: UInt128Parts) -> u128 {
    ((parts.hi as u128) << 64) | parts.lo as u128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_minus_one() {
        let p = split_i128(-1);
        assert_eq!(p.hi, -1);
        assert_eq!(p.lo, u64::MAX);
        assert_eq!(join_i128(p), -1);
    }

    #[test]
    fn split_two_pow_63() {
        let n = 1i128 << 63;
        let p = split_i128(n);
        assert_eq!(p.hi, 0);
        assert_eq!(p.lo, 1u64 << 63);
        assert_eq!(join_i128(p), n);
    }

    #[test]
    fn split_extremes() {
        for n in [i128::MIN, i128::MAX, -(1i128 << 63), 0] {
            assert_eq!(join_i128(split_i128(n)), n, "n = {n}");
        }
        assert_eq!(join_u128(split_u128(u128::MAX)), u128::MAX);
    }

    #[test]
    fn negative_carrier_normalises_hi() {
        let p = split_u128_from_signed(-1);
        assert_eq!(p, UInt128Parts { hi: u64::MAX, lo: u64::MAX });
        assert_eq!(join_u128(p), u128::MAX);
    }

    #[test]
    fn non_negative_carrier_matches_unsigned_split() {
        let n = 0x1234_5678_9abc_def0_1122_3344_5566_7788i128;
        assert_eq!(split_u128_from_signed(n), split_u128(n as u128));
    }
}
