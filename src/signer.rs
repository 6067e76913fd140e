//! secp256k1 signing over EIP-712 digests.
//!
//! Signatures are 65 bytes `r ‖ s ‖ v` with `v` in the legacy `{27, 28}` range,
//! which is what the delegate registry recovers against.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

use crate::error::SdkError;
use crate::shared::Address;

/// Offset added to the raw recovery id (0/1) to get the legacy `v`.
pub const LEGACY_V_OFFSET: u8 = 27;

/// A 65-byte recoverable signature with legacy `v`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 65]);

impl Signature {
    pub const LEN: usize = 65;

    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn r(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.0[..32]);
        r
    }

    pub fn s(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.0[32..64]);
        s
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// `"0x"` + lowercase hex, the form the registry accepts.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a `0x`-prefixed (or bare) 130-char hex signature.
    pub fn from_hex(s: &str) -> Result<Self, SdkError> {
        let mut bytes = [0u8; 65];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes)
            .map_err(|e| SdkError::Signing(format!("invalid signature hex: {}", e)))?;
        Ok(Self(bytes))
    }

    /// Recover the address that produced this signature over `digest`.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<Address, SdkError> {
        let raw_v = self
            .v()
            .checked_sub(LEGACY_V_OFFSET)
            .ok_or_else(|| SdkError::Signing(format!("unexpected v value {}", self.v())))?;
        let recovery_id = RecoveryId::from_byte(raw_v)
            .ok_or_else(|| SdkError::Signing(format!("unexpected v value {}", self.v())))?;
        let signature = EcdsaSignature::from_slice(&self.0[..64])
            .map_err(|e| SdkError::Signing(e.to_string()))?;
        let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|e| SdkError::Signing(e.to_string()))?;
        Ok(Address::from_verifying_key(&key))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Sign a 32-byte digest as-is (no re-hashing) with RFC 6979 nonces.
pub fn sign_digest(digest: &[u8; 32], key: &SigningKey) -> Result<Signature, SdkError> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|e| SdkError::Signing(e.to_string()))?;

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&signature.to_bytes());
    bytes[64] = recovery_id.to_byte() + LEGACY_V_OFFSET;
    Ok(Signature(bytes))
}
