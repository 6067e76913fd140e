//! Network URL constants and EIP-712 domain constants for the Safe delegate registry.

/// Default registry base URL; `{chain_id}` is replaced with the numeric chain id.
pub const DEFAULT_REGISTRY_URL_TEMPLATE: &str =
    "https://safe-client.safe.global/v2/chains/{chain_id}/delegates/";

/// EIP-712 domain name the registry verifies against.
pub const DOMAIN_NAME: &str = "Safe Transaction Service";

/// EIP-712 domain version the registry verifies against.
pub const DOMAIN_VERSION: &str = "1.0";

/// Default registry collection URL for a chain.
pub fn default_registry_url(chain_id: u64) -> String {
    DEFAULT_REGISTRY_URL_TEMPLATE.replace("{chain_id}", &chain_id.to_string())
}

/// Pick the registry URL: an explicit override wins over the chain default.
pub fn registry_url(chain_id: u64, override_url: Option<&str>) -> String {
    match override_url {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => default_registry_url(chain_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_url_templates_chain_id() {
        assert_eq!(
            default_registry_url(11155111),
            "https://safe-client.safe.global/v2/chains/11155111/delegates/"
        );
    }

    #[test]
    fn test_override_takes_precedence() {
        assert_eq!(
            registry_url(1, Some("http://localhost:8000/api/v2/delegates/")),
            "http://localhost:8000/api/v2/delegates/"
        );
        assert_eq!(registry_url(1, None), default_registry_url(1));
        assert_eq!(registry_url(1, Some("")), default_registry_url(1));
    }
}
