//! Encrypted keystore files (Web3 Secret Storage v3).
//!
//! Only available with the `keystore` feature.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::SdkError;
use crate::keystore::{DecryptedKey, KeyProvider};

/// A keystore file plus the passphrase that unlocks it.
///
/// Without a passphrase, [`KeyProvider::decrypt`] prompts for one on the
/// terminal (input is not echoed).
pub struct KeystoreFile {
    path: PathBuf,
    password: Option<Zeroizing<String>>,
}

impl KeystoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            password: None,
        }
    }

    /// Use `password` instead of prompting. An empty password still prompts.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = if password.is_empty() {
            None
        } else {
            Some(Zeroizing::new(password))
        };
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn passphrase(&self) -> Result<Zeroizing<String>, SdkError> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        let prompt = format!(
            "Please provide a password for keystore ({}): ",
            self.path.display()
        );
        rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| SdkError::KeyDecryption(format!("error reading password: {}", e)))
    }
}

impl KeyProvider for KeystoreFile {
    fn decrypt(&self) -> Result<DecryptedKey, SdkError> {
        let password = self.passphrase()?;
        let secret = eth_keystore::decrypt_key(&self.path, password.as_bytes())
            .map(Zeroizing::new)
            .map_err(|e| SdkError::KeyDecryption(format!("{}: {}", self.path.display(), e)))?;

        let key = DecryptedKey::from_secret_bytes(&secret)?;
        tracing::debug!(address = %key.address(), "Decrypted keystore {}", self.path.display());
        Ok(key)
    }
}

impl std::fmt::Debug for KeystoreFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoreFile")
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::keccak256;

    fn write_keystore(dir: &Path, password: &str) -> PathBuf {
        let secret = keccak256("cow");
        let mut rng = rand::thread_rng();
        eth_keystore::encrypt_key(dir, &mut rng, secret, password, Some("cow.json")).unwrap();
        dir.join("cow.json")
    }

    #[test]
    fn test_decrypts_with_correct_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(dir.path(), "correct horse");
        let key = KeystoreFile::new(&path)
            .with_password("correct horse")
            .decrypt()
            .unwrap();
        assert_eq!(
            key.address().to_checksum(),
            "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
        );
    }

    #[test]
    fn test_wrong_password_is_key_decryption_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(dir.path(), "correct horse");
        let err = KeystoreFile::new(&path)
            .with_password("battery staple")
            .decrypt()
            .unwrap_err();
        assert!(matches!(err, SdkError::KeyDecryption(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_file_is_key_decryption_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeystoreFile::new(dir.path().join("absent.json"))
            .with_password("pw")
            .decrypt()
            .unwrap_err();
        assert!(matches!(err, SdkError::KeyDecryption(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let ks = KeystoreFile::new("/tmp/key.json").with_password("hunter2");
        let dbg = format!("{:?}", ks);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
