//! Shared newtypes and utilities used across all modules.
//!
//! These types are serialization-transparent: they serialize/deserialize as the
//! plain strings the registry sends and expects, so they can be used directly in
//! wire types without conversion overhead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::str::FromStr;

use crate::error::SdkError;

/// Keccak-256 of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Keccak256::digest(data.as_ref()).into()
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// A 20-byte Ethereum address.
///
/// Displays and serializes in EIP-55 checksum case. The registry treats
/// differently-cased strings as distinct, so everything that leaves the SDK goes
/// through [`Address::to_checksum`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse a hex address, with or without `0x`. Case is not validated.
    pub fn parse(s: &str) -> Result<Self, SdkError> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex_part.len() != 2 * Self::LEN {
            return Err(SdkError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|_| SdkError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Whether `s` is a syntactically valid hex address.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// EIP-55 mixed-case encoding with `0x` prefix.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Normalize any valid hex address string to checksum case.
    pub fn checksum(s: &str) -> Result<String, SdkError> {
        Ok(Self::parse(s)?.to_checksum())
    }

    /// The address left-padded to a 32-byte ABI word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }

    /// Derive the address controlled by a secp256k1 public key.
    pub fn from_verifying_key(key: &k256::ecdsa::VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── TotpWindow ──────────────────────────────────────────────────────────────

/// Length of one replay-protection window.
pub const TOTP_WINDOW_SECONDS: u64 = 3600;

/// Hourly counter the registry uses as a replay-protection nonce.
///
/// Take it once per operation and reuse it; recomputing near an hour boundary
/// yields a different value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TotpWindow(u64);

impl TotpWindow {
    pub fn now() -> Self {
        let secs = chrono::Utc::now().timestamp().max(0) as u64;
        Self::from_unix_seconds(secs)
    }

    pub fn from_unix_seconds(secs: u64) -> Self {
        Self(secs / TOTP_WINDOW_SECONDS)
    }

    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TotpWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP55_VECTORS: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_matches_eip55_vectors() {
        for expected in EIP55_VECTORS {
            let lower = expected.to_lowercase();
            assert_eq!(Address::checksum(&lower).unwrap(), expected);
            let upper = format!("0x{}", expected[2..].to_uppercase());
            assert_eq!(Address::checksum(&upper).unwrap(), expected);
        }
    }

    #[test]
    fn test_checksum_is_idempotent() {
        for v in EIP55_VECTORS {
            let once = Address::checksum(&v.to_lowercase()).unwrap();
            let twice = Address::checksum(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_parse_accepts_missing_prefix() {
        let a = Address::parse("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(a.to_string(), EIP55_VECTORS[0]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "0x",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAe",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAedd",
            "0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "not an address",
        ] {
            assert!(
                matches!(Address::parse(bad), Err(SdkError::InvalidAddress(_))),
                "{bad:?} should be rejected"
            );
            assert!(!Address::is_valid(bad));
        }
    }

    #[test]
    fn test_address_serde_uses_checksum() {
        let a = Address::parse(&EIP55_VECTORS[1].to_lowercase()).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", EIP55_VECTORS[1]));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
        assert!(serde_json::from_str::<Address>("\"0x1234\"").is_err());
    }

    #[test]
    fn test_to_word_left_pads() {
        let a = Address::from_bytes([0xab; 20]);
        let word = a.to_word();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &[0xab; 20]);
    }

    #[test]
    fn test_totp_window_floors_to_the_hour() {
        assert_eq!(TotpWindow::from_unix_seconds(0).value(), 0);
        assert_eq!(TotpWindow::from_unix_seconds(3599).value(), 0);
        assert_eq!(TotpWindow::from_unix_seconds(3600).value(), 1);
        assert_eq!(TotpWindow::from_unix_seconds(1_728_000_000).value(), 480_000);
        assert_eq!(TotpWindow::from_value(480_000).to_string(), "480000");
    }

    #[test]
    fn test_totp_window_now_is_current_hour() {
        let expected = chrono::Utc::now().timestamp() as u64 / TOTP_WINDOW_SECONDS;
        let window = TotpWindow::now().value();
        assert!(window == expected || window == expected + 1);
    }
}
