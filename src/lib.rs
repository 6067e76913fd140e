//! # Safe delegates SDK
//!
//! Authorize and revoke delegates for a Safe multisig through the Safe
//! Transaction Service delegate registry.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Addresses, TOTP windows, EIP-712 typed data and hashing (always available)
//! 2. **Keys + signing** — Key providers and secp256k1 signatures with legacy `v`
//! 3. **HTTP** — `RegistryHttp` and JSON-RPC chain-id resolution
//! 4. **High-Level Client** — `SafeDelegatesClient` with the `delegates()` sub-client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_delegates::prelude::*;
//!
//! let client = SafeDelegatesClient::builder()
//!     .rpc_url("https://ethereum-rpc.publicnode.com")
//!     .build()?;
//!
//! let key = KeystoreFile::new("./keystore.json");
//! client.delegates().add(safe, delegate, "proposer bot", &key).await?;
//!
//! let listing = client.delegates().list(&DelegateFilter::for_safe(safe)).await?;
//! println!("{listing}");
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes: checksummed addresses, TOTP windows, keccak.
pub mod shared;

/// EIP-712 typed data and hashing.
pub mod typed_data;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Registry URL and signing-domain constants.
pub mod network;

// ── Layer 2: Keys + signing ──────────────────────────────────────────────────

/// Key providers: raw keys and encrypted keystore files.
pub mod keystore;

/// secp256k1 signatures over typed-data digests.
pub mod signer;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// Registry HTTP client and JSON-RPC helpers.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `SafeDelegatesClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Address, TotpWindow};

    // Typed data
    pub use crate::typed_data::{delegate_typed_data, TypedData, TypedDataDomain};

    // Domain types — delegate
    pub use crate::domain::delegate::{
        sign_delegation, DelegateFilter, DelegateListing, DelegatePage, DelegateRecord,
    };

    // Keys + signing
    #[cfg(feature = "keystore")]
    pub use crate::keystore::KeystoreFile;
    pub use crate::keystore::{DecryptedKey, KeyProvider, PrivateKey};
    pub use crate::signer::{sign_digest, Signature};

    // Errors
    pub use crate::error::{HttpError, SdkError, SdkResult};

    // Network
    pub use crate::network::{default_registry_url, DEFAULT_REGISTRY_URL_TEMPLATE};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        ChainSource, ClientConfig, DelegatesClient, SafeDelegatesClient,
        SafeDelegatesClientBuilder,
    };
}
