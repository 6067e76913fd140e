//! Delegates sub-client for the registry endpoints.
//!
//! Add and remove run strictly in order: decrypt key, resolve chain id, sign,
//! send. The TOTP window is read once per call.

use crate::client::SafeDelegatesClient;
use crate::domain::delegate::wire::{
    CreateDelegateRequest, DeleteDelegateRequest, DelegatesPageResponse, ListDelegatesParams,
};
use crate::domain::delegate::{
    sign_delegation, DelegateFilter, DelegateListing, DelegatePage, DelegateRecord,
};
use crate::error::SdkError;
use crate::keystore::KeyProvider;
use crate::shared::{Address, TotpWindow};

use reqwest::StatusCode;

const ADD_ACCEPTED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];
const LIST_ACCEPTED: &[StatusCode] = &[StatusCode::OK];
const REMOVE_ACCEPTED: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT];

pub struct Delegates<'a> {
    pub(crate) client: &'a SafeDelegatesClient,
}

impl<'a> Delegates<'a> {
    /// Authorize `delegate` to act for `safe`, signed by the key from `key`.
    ///
    /// `label` must be non-empty. Returns the record as submitted.
    ///
    /// Blocks the current task while `key` decrypts (see [`KeyProvider`]).
    pub async fn add<K: KeyProvider + ?Sized>(
        &self,
        safe: &str,
        delegate: &str,
        label: &str,
        key: &K,
    ) -> Result<DelegateRecord, SdkError> {
        let safe = Address::parse(safe)?;
        let delegate = Address::parse(delegate)?;
        if label.is_empty() {
            return Err(SdkError::Validation(
                "label is required when adding a delegate".to_string(),
            ));
        }

        let key = key.decrypt()?;
        let chain_id = self.client.chain_id().await?;
        let signature = sign_delegation(&delegate, &key, chain_id, TotpWindow::now())?;
        let delegator = key.address();
        drop(key);

        let body = CreateDelegateRequest {
            safe: safe.to_checksum(),
            delegate: delegate.to_checksum(),
            delegator: delegator.to_checksum(),
            signature: signature.to_hex(),
            label: label.to_string(),
        };
        let url = self.client.registry_url(chain_id);
        self.client.http.post_json(&url, &body, ADD_ACCEPTED).await?;

        tracing::info!(%safe, %delegate, %delegator, chain_id, "Delegate added");
        Ok(DelegateRecord {
            safe: Some(safe),
            delegate,
            delegator,
            label: label.to_string(),
        })
    }

    /// List delegates matching `filter`. Cursors are not followed.
    pub async fn list(&self, filter: &DelegateFilter) -> Result<DelegateListing, SdkError> {
        let page = self.list_page(filter).await?;
        Ok(DelegateListing::from(page.results))
    }

    /// Like [`list`](Self::list) but keeps `count`/`next`/`previous`.
    pub async fn list_page(&self, filter: &DelegateFilter) -> Result<DelegatePage, SdkError> {
        let params = list_params(filter)?;
        let base = self.client.list_url().await?;
        let separator = if base.contains('?') { '&' } else { '?' };
        let url = format!("{}{}{}", base, separator, params.to_query_string()?);

        let resp: DelegatesPageResponse = self.client.http.get_json(&url, LIST_ACCEPTED).await?;
        let page = DelegatePage::try_from(resp)?;
        tracing::debug!(count = page.count, returned = page.results.len(), "Listed delegates");
        Ok(page)
    }

    /// Revoke `delegate` for `safe`, signed by the key from `key`.
    ///
    /// Blocks the current task while `key` decrypts (see [`KeyProvider`]).
    pub async fn remove<K: KeyProvider + ?Sized>(
        &self,
        safe: &str,
        delegate: &str,
        key: &K,
    ) -> Result<(), SdkError> {
        let safe = Address::parse(safe)?;
        let delegate = Address::parse(delegate)?;

        let key = key.decrypt()?;
        let chain_id = self.client.chain_id().await?;
        let signature = sign_delegation(&delegate, &key, chain_id, TotpWindow::now())?;
        let delegator = key.address();
        drop(key);

        let body = DeleteDelegateRequest {
            safe: safe.to_checksum(),
            delegator: delegator.to_checksum(),
            signature: signature.to_hex(),
        };
        let url = self.client.delete_url(chain_id);
        self.client.http.delete_json(&url, &body, REMOVE_ACCEPTED).await?;

        tracing::info!(%safe, %delegate, %delegator, chain_id, "Delegate removed");
        Ok(())
    }
}

/// Checksum the address filters and drop empty or zero values.
fn list_params(filter: &DelegateFilter) -> Result<ListDelegatesParams, SdkError> {
    let optional_address = |s: &str| -> Result<Option<String>, SdkError> {
        if s.is_empty() {
            Ok(None)
        } else {
            Address::checksum(s).map(Some)
        }
    };

    Ok(ListDelegatesParams {
        safe: Address::checksum(&filter.safe)?,
        delegate: optional_address(&filter.delegate)?,
        delegator: optional_address(&filter.delegator)?,
        label: (!filter.label.is_empty()).then(|| filter.label.clone()),
        limit: (filter.limit > 0).then_some(filter.limit),
        offset: (filter.offset > 0).then_some(filter.offset),
    })
}
