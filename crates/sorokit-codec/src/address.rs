//! Contract and account addresses and their canonical strkey text form.
//!
//! A strkey is `base32(version ‖ key[32] ‖ crc16_xmodem_le(version ‖ key))`:
//! 35 bytes, always 56 characters. The version byte fixes the first
//! character: `G` for accounts, `C` for contracts.

use std::fmt;
use std::str::FromStr;

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use thiserror::Error;

/// Length of a canonical address string.
pub const STRKEY_LEN: usize = 56;

const VERSION_ACCOUNT: u8 = 6 << 3;
const VERSION_CONTRACT: u8 = 2 << 3;
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("expected {STRKEY_LEN} characters, got {0}")]
    Length(usize),

    #[error("not valid base32")]
    Base32,

    #[error("unknown version byte {0:#04x}")]
    Version(u8),

    #[error("checksum mismatch")]
    Checksum,
}

/// An address on the ledger: either an account key or a contract hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScAddress {
    Account([u8; 32]),
    Contract([u8; 32]),
}

impl ScAddress {
    /// Parse canonical strkey text.
    pub fn from_strkey(s: &str) -> Result<Self, AddressError> {
        if s.len() != STRKEY_LEN {
            return Err(AddressError::Length(s.len()));
        }
        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|_| AddressError::Base32)?;
        // 56 base32 chars always decode to 35 bytes.
        let (body, checksum) = raw.split_at(33);
        let expected = CRC16.checksum(body).to_le_bytes();
        if checksum != expected {
            return Err(AddressError::Checksum);
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&body[1..]);
        match body[0] {
            VERSION_ACCOUNT => Ok(Self::Account(key)),
            VERSION_CONTRACT => Ok(Self::Contract(key)),
            other => Err(AddressError::Version(other)),
        }
    }

    /// Render as canonical strkey text.
    pub fn to_strkey(&self) -> String {
        let (version, key) = match self {
            Self::Account(k) => (VERSION_ACCOUNT, k),
            Self::Contract(k) => (VERSION_CONTRACT, k),
        };
        let mut raw = Vec::with_capacity(35);
        raw.push(version);
        raw.extend_from_slice(key);
        let checksum = CRC16.checksum(&raw);
        raw.extend_from_slice(&checksum.to_le_bytes());
        BASE32_NOPAD.encode(&raw)
    }

    /// The raw 32-byte key or contract hash.
    pub fn key(&self) -> &[u8; 32] {
        match self {
            Self::Account(k) | Self::Contract(k) => k,
        }
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

impl fmt::Display for ScAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl FromStr for ScAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_strkey(s)
    }
}

/// Structural test used by auto-detection: right length, a reserved
/// prefix, and only base32 characters. Does not verify the checksum.
pub fn has_address_shape(s: &str) -> bool {
    s.len() == STRKEY_LEN
        && (s.starts_with('G') || s.starts_with('C'))
        && s.bytes().all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";
    const ZERO_CONTRACT: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

    #[test]
    fn zero_keys_render_known_strkeys() {
        assert_eq!(ScAddress::Account([0; 32]).to_strkey(), ZERO_ACCOUNT);
        assert_eq!(ScAddress::Contract([0; 32]).to_strkey(), ZERO_CONTRACT);
    }

    #[test]
    fn parse_sequential_contract_key() {
        let key: [u8; 32] = std::array::from_fn(|i| i as u8);
        let addr: ScAddress = "CAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6N4O"
            .parse()
            .unwrap();
        assert_eq!(addr, ScAddress::Contract(key));
        assert!(addr.is_contract());
    }

    #[test]
    fn checksum_is_verified() {
        let mut bad = ZERO_ACCOUNT.to_string();
        bad.replace_range(55..56, "G");
        assert_eq!(ScAddress::from_strkey(&bad), Err(AddressError::Checksum));
    }

    #[test]
    fn wrong_length_rejected() {
        assert_eq!(ScAddress::from_strkey("GABC"), Err(AddressError::Length(4)));
    }

    #[test]
    fn shape_check() {
        assert!(has_address_shape(ZERO_ACCOUNT));
        assert!(has_address_shape(ZERO_CONTRACT));
        assert!(!has_address_shape(&ZERO_ACCOUNT.replace('G', "M")));
        assert!(!has_address_shape("hello"));
        assert!(!has_address_shape(&ZERO_CONTRACT.to_lowercase()));
    }
}
