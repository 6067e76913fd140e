//! Key providers: where the delegator's signing key comes from.
//!
//! ## Key handling
//!
//! - A [`DecryptedKey`] is produced per operation by [`KeyProvider::decrypt`] and
//!   dropped as soon as the request is signed. Nothing caches it.
//! - The secret scalar is zeroized on drop; the raw bytes it was built from are
//!   held in [`Zeroizing`] buffers.
//! - `Debug` prints the address only.
//!
//! The keystore-file provider lives in [`file`] behind the `keystore` feature.

#[cfg(feature = "keystore")]
pub mod file;

use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::error::SdkError;
use crate::shared::Address;

#[cfg(feature = "keystore")]
pub use file::KeystoreFile;

/// A decrypted secp256k1 key and the address it controls.
pub struct DecryptedKey {
    address: Address,
    signing_key: SigningKey,
}

impl DecryptedKey {
    /// Build from a raw 32-byte private key.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, SdkError> {
        let secret = Zeroizing::new(secret.to_vec());
        let signing_key = SigningKey::from_slice(&secret)
            .map_err(|_| SdkError::KeyDecryption("invalid secp256k1 private key".to_string()))?;
        let address = Address::from_verifying_key(signing_key.verifying_key());
        Ok(Self {
            address,
            signing_key,
        })
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for DecryptedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedKey")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Source of the delegator key for add/remove operations.
///
/// Called once per operation, before any network activity.
///
/// `decrypt` is synchronous and may block: keystore files run scrypt (about a
/// second with geth defaults) and may prompt on the terminal. Async callers are
/// blocked for that long.
pub trait KeyProvider {
    fn decrypt(&self) -> Result<DecryptedKey, SdkError>;
}

/// Raw private key held in memory.
///
/// For callers whose key already lives in a secrets manager or HSM export.
pub struct PrivateKey(Zeroizing<[u8; 32]>);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Parse a `0x`-prefixed or bare 64-char hex private key.
    pub fn from_hex(s: &str) -> Result<Self, SdkError> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(s.trim().trim_start_matches("0x"), &mut bytes[..])
            .map_err(|_| SdkError::KeyDecryption("invalid private key hex".to_string()))?;
        Ok(Self(bytes))
    }
}

impl KeyProvider for PrivateKey {
    fn decrypt(&self) -> Result<DecryptedKey, SdkError> {
        DecryptedKey::from_secret_bytes(&self.0[..])
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::keccak256;

    #[test]
    fn test_private_key_provider_derives_address() {
        let provider = PrivateKey::from_bytes(keccak256("cow"));
        let key = provider.decrypt().unwrap();
        assert_eq!(
            key.address().to_checksum(),
            "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
        );
    }

    #[test]
    fn test_private_key_from_hex() {
        let hex_key = format!("0x{}", hex::encode(keccak256("cow")));
        let key = PrivateKey::from_hex(&hex_key).unwrap().decrypt().unwrap();
        assert_eq!(
            key.address().to_checksum(),
            "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
        );
        assert!(matches!(
            PrivateKey::from_hex("0xnothex"),
            Err(SdkError::KeyDecryption(_))
        ));
    }

    #[test]
    fn test_zero_key_is_rejected() {
        assert!(matches!(
            DecryptedKey::from_secret_bytes(&[0u8; 32]),
            Err(SdkError::KeyDecryption(_))
        ));
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let secret = keccak256("cow");
        let provider = PrivateKey::from_bytes(secret);
        let key = provider.decrypt().unwrap();
        let secret_hex = hex::encode(secret);
        assert!(!format!("{:?}", provider).contains(&secret_hex));
        assert!(!format!("{:?}", key).contains(&secret_hex));
        assert!(format!("{:?}", key).contains("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"));
    }
}
