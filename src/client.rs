//! High-level client — `SafeDelegatesClient` with its sub-client accessor.
//!
//! The delegate operations live in `domain/delegate/client.rs`. This module keeps
//! the configuration, the builder, chain-id resolution and registry URL selection.

use crate::domain::delegate::client::Delegates;
use crate::error::SdkError;
use crate::http::{resolve_chain_id, RegistryHttp, DEFAULT_TIMEOUT};
use crate::network;

use std::time::Duration;

pub use crate::domain::delegate::client::Delegates as DelegatesClient;

/// Environment variable holding the JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "SAFE_DELEGATES_RPC_URL";
/// Environment variable holding a fixed chain id.
pub const ENV_CHAIN_ID: &str = "SAFE_DELEGATES_CHAIN_ID";
/// Environment variable holding a registry URL override.
pub const ENV_API_URL: &str = "SAFE_DELEGATES_API_URL";

/// Where the chain id for the EIP-712 domain comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainSource {
    /// Ask the node for `eth_chainId` on every signed operation.
    Rpc(String),
    /// Use this chain id without any RPC call.
    Fixed(u64),
}

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub chain: ChainSource,
    /// Registry collection URL. `None` uses the per-chain default.
    pub registry_url: Option<String>,
    pub timeout: Duration,
}

/// The primary entry point for the SDK.
///
/// ```rust,ignore
/// let client = SafeDelegatesClient::builder().rpc_url("https://rpc.ankr.com/eth").build()?;
/// client.delegates().add(safe, delegate, "ops bot", &KeystoreFile::new(path)).await?;
/// ```
#[derive(Clone)]
pub struct SafeDelegatesClient {
    pub(crate) http: RegistryHttp,
    pub(crate) config: ClientConfig,
}

impl SafeDelegatesClient {
    pub fn builder() -> SafeDelegatesClientBuilder {
        SafeDelegatesClientBuilder::default()
    }

    pub fn new(config: ClientConfig) -> Result<Self, SdkError> {
        Ok(Self {
            http: RegistryHttp::new(config.timeout)?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn delegates(&self) -> Delegates<'_> {
        Delegates { client: self }
    }

    // ── Chain + registry selection ───────────────────────────────────────

    /// Chain id for the signing domain and the default registry URL.
    pub async fn chain_id(&self) -> Result<u64, SdkError> {
        match &self.config.chain {
            ChainSource::Fixed(id) => Ok(*id),
            ChainSource::Rpc(url) => resolve_chain_id(self.http.inner(), url).await,
        }
    }

    fn registry_override(&self) -> Option<&str> {
        self.config
            .registry_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Collection URL for POST.
    pub(crate) fn registry_url(&self, chain_id: u64) -> String {
        let url = network::registry_url(chain_id, self.registry_override());
        tracing::debug!(
            overridden = self.registry_override().is_some(),
            "Using registry {}",
            url
        );
        url
    }

    /// URL for DELETE. The default collection URL loses its trailing slash; an
    /// override is used as given.
    pub(crate) fn delete_url(&self, chain_id: u64) -> String {
        match self.registry_override() {
            Some(url) => url.to_string(),
            None => network::default_registry_url(chain_id)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Collection URL for GET. Skips chain resolution when overridden.
    pub(crate) async fn list_url(&self) -> Result<String, SdkError> {
        match self.registry_override() {
            Some(url) => Ok(url.to_string()),
            None => Ok(self.registry_url(self.chain_id().await?)),
        }
    }
}

impl std::fmt::Debug for SafeDelegatesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeDelegatesClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SafeDelegatesClientBuilder {
    rpc_url: Option<String>,
    chain_id: Option<u64>,
    registry_url: Option<String>,
    timeout: Duration,
}

impl Default for SafeDelegatesClientBuilder {
    fn default() -> Self {
        Self {
            rpc_url: None,
            chain_id: None,
            registry_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SafeDelegatesClientBuilder {
    /// Seed the builder from `SAFE_DELEGATES_RPC_URL`, `SAFE_DELEGATES_CHAIN_ID`
    /// and `SAFE_DELEGATES_API_URL`. Unset or empty variables are skipped.
    pub fn from_env() -> Result<Self, SdkError> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut builder = Self::default();
        if let Some(url) = var(ENV_RPC_URL) {
            builder = builder.rpc_url(url.trim());
        }
        if let Some(id) = var(ENV_CHAIN_ID) {
            let id = id.trim().parse::<u64>().map_err(|e| {
                SdkError::Validation(format!("{} is not a chain id: {}", ENV_CHAIN_ID, e))
            })?;
            builder = builder.chain_id(id);
        }
        if let Some(url) = var(ENV_API_URL) {
            builder = builder.registry_url(url.trim());
        }
        Ok(builder)
    }

    /// JSON-RPC endpoint used only for `eth_chainId`.
    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = Some(url.to_string());
        self
    }

    /// Fixed chain id. Takes precedence over `rpc_url`.
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Override the registry collection URL.
    pub fn registry_url(mut self, url: &str) -> Self {
        self.registry_url = Some(url.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate into a [`ClientConfig`] without building an HTTP client.
    pub fn into_config(self) -> Result<ClientConfig, SdkError> {
        let chain = match (self.chain_id, self.rpc_url) {
            (Some(0), _) => {
                return Err(SdkError::Validation("chain id must be non-zero".to_string()))
            }
            (Some(id), _) => ChainSource::Fixed(id),
            (None, Some(url)) if !url.is_empty() => ChainSource::Rpc(url),
            _ => {
                return Err(SdkError::Validation(
                    "either an RPC URL or a chain id is required".to_string(),
                ))
            }
        };
        if self.timeout.is_zero() {
            return Err(SdkError::Validation("timeout must be non-zero".to_string()));
        }

        Ok(ClientConfig {
            chain,
            registry_url: self.registry_url.filter(|url| !url.is_empty()),
            timeout: self.timeout,
        })
    }

    pub fn build(self) -> Result<SafeDelegatesClient, SdkError> {
        SafeDelegatesClient::new(self.into_config()?)
    }
}
