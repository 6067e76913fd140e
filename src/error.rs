//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Key decryption failed: {0}")]
    KeyDecryption(String),

    #[error("Chain resolution failed: {0}")]
    ChainResolution(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Typed data error: {0}")]
    TypedData(String),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Connection, DNS, TLS or timeout failure.
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registry answered with a status outside the operation's success set.
    /// The body is kept verbatim; it is the only explanation the registry gives.
    #[error("Registry rejected request with status {status}: {body}")]
    RegistryRejected { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid query: {0}")]
    Query(String),
}

impl HttpError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RegistryRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias used throughout the SDK.
pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_rejected_display_carries_status_and_body() {
        let err: SdkError = HttpError::RegistryRejected {
            status: 400,
            body: r#"{"detail":"bad signature"}"#.to_string(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("bad signature"));
    }

    #[test]
    fn test_status_only_for_rejections() {
        let rejected = HttpError::RegistryRejected {
            status: 404,
            body: String::new(),
        };
        assert_eq!(rejected.status(), Some(404));
        assert_eq!(HttpError::Decode("eof".into()).status(), None);
    }
}
