//! Delegate domain — registry records, list filters and pages.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::error::SdkError;
use crate::keystore::DecryptedKey;
use crate::shared::{Address, TotpWindow};
use crate::signer::{sign_digest, Signature};
use crate::typed_data::delegate_typed_data;
use serde::{Deserialize, Serialize};

/// Sign the `Delegate` typed data authorizing (or revoking) `delegate`.
///
/// Add and remove sign the same message; the registry tells them apart by verb.
pub fn sign_delegation(
    delegate: &Address,
    key: &DecryptedKey,
    chain_id: u64,
    totp: TotpWindow,
) -> Result<Signature, SdkError> {
    let typed_data = delegate_typed_data(&delegate.to_checksum(), totp, chain_id)?;
    let digest = typed_data.hash()?;
    sign_digest(&digest, key.signing_key())
}

/// One delegation as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateRecord {
    /// `None` for delegations not scoped to a single Safe.
    pub safe: Option<Address>,
    pub delegate: Address,
    pub delegator: Address,
    pub label: String,
}

/// One page of list results, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatePage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<DelegateRecord>,
}

/// Outcome of a list call. An empty page is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateListing {
    Found(Vec<DelegateRecord>),
    NoDelegatesFound,
}

impl DelegateListing {
    pub fn records(&self) -> &[DelegateRecord] {
        match self {
            Self::Found(records) => records,
            Self::NoDelegatesFound => &[],
        }
    }

    pub fn into_records(self) -> Vec<DelegateRecord> {
        match self {
            Self::Found(records) => records,
            Self::NoDelegatesFound => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoDelegatesFound)
    }
}

impl From<Vec<DelegateRecord>> for DelegateListing {
    fn from(records: Vec<DelegateRecord>) -> Self {
        if records.is_empty() {
            Self::NoDelegatesFound
        } else {
            Self::Found(records)
        }
    }
}

impl std::fmt::Display for DelegateListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDelegatesFound => f.write_str("no delegates found"),
            Self::Found(records) => {
                for (i, r) in records.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    let safe = r.safe.map(|s| s.to_checksum()).unwrap_or_default();
                    write!(
                        f,
                        "Safe: {}, Delegate: {}, Delegator: {}, Label: {}",
                        safe, r.delegate, r.delegator, r.label
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Filters for listing delegates.
///
/// `safe` is always sent. Empty strings and zero `limit`/`offset` are omitted
/// from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegateFilter {
    pub safe: String,
    pub delegate: String,
    pub delegator: String,
    pub label: String,
    pub limit: u32,
    pub offset: u32,
}

impl DelegateFilter {
    pub fn for_safe(safe: impl Into<String>) -> Self {
        Self {
            safe: safe.into(),
            ..Self::default()
        }
    }

    pub fn delegate(mut self, delegate: impl Into<String>) -> Self {
        self.delegate = delegate.into();
        self
    }

    pub fn delegator(mut self, delegator: impl Into<String>) -> Self {
        self.delegator = delegator.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}
