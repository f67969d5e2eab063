//! 20-byte account and implementation identities.
//!
//! The same identity space is used for token holders, the council and the
//! code implementations a proxy can point at. [`Address::ZERO`] doubles as the
//! mint/burn sentinel on the ledger and as the "no implementation" value in
//! governance.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A 20-byte identity, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// The null identity. Used as the mint sentinel and as "nothing voted / scheduled".
    pub const ZERO: Self = Self([0u8; 20]);

    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an address whose low 8 bytes hold `index` (big-endian).
    ///
    /// Handy for fixtures and scripted scenarios: `from_index(0)` is [`Address::ZERO`].
    pub fn from_index(index: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&index.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != Self::LEN * 2 {
            return Err(TypesError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| TypesError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default_and_index_zero() {
        assert_eq!(Address::default(), Address::ZERO);
        assert_eq!(Address::from_index(0), Address::ZERO);
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_index(1).is_zero());
    }

    #[test]
    fn display_parses_back() {
        let addr = Address::from_index(0xdead_beef);
        let text = addr.to_string();
        assert_eq!(text, "0x00000000000000000000000000000000deadbeef");
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn debug_shows_every_byte() {
        let mut high = [0u8; 20];
        high[0] = 0xab;
        high[19] = 0x01;
        let high = Address::new(high);
        let low = Address::from_index(1);
        assert_eq!(
            format!("{low:?}"),
            "Address(0x0000000000000000000000000000000000000001)"
        );
        assert_ne!(format!("{high:?}"), format!("{low:?}"));
    }

    #[test]
    fn parse_accepts_missing_prefix() {
        let addr: Address = "00000000000000000000000000000000000000aa".parse().unwrap();
        assert_eq!(addr, Address::from_index(0xaa));
    }

    #[test]
    fn parse_rejects_bad_length_and_digits() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(TypesError::InvalidAddress(_))
        ));
        assert!(matches!(
            "0xzz00000000000000000000000000000000000000".parse::<Address>(),
            Err(TypesError::InvalidAddress(_))
        ));
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::from_index(7);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000007\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
