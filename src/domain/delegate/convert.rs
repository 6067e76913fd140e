//! Conversions from wire types to domain types for delegates.

use super::wire::{DelegateResponse, DelegatesPageResponse};
use super::{DelegatePage, DelegateRecord};
use crate::error::{HttpError, SdkError};
use crate::shared::Address;

/// Parse an address the registry sent. Failures are decode errors naming the field.
fn response_address(field: &str, value: &str) -> Result<Address, HttpError> {
    Address::parse(value)
        .map_err(|_| HttpError::Decode(format!("invalid {} address '{}'", field, value)))
}

impl TryFrom<DelegateResponse> for DelegateRecord {
    type Error = HttpError;

    fn try_from(r: DelegateResponse) -> Result<Self, Self::Error> {
        let safe = match r.safe.as_deref() {
            None | Some("") => None,
            Some(s) => Some(response_address("safe", s)?),
        };
        Ok(Self {
            safe,
            delegate: response_address("delegate", &r.delegate)?,
            delegator: response_address("delegator", &r.delegator)?,
            label: r.label,
        })
    }
}

impl TryFrom<DelegatesPageResponse> for DelegatePage {
    type Error = SdkError;

    fn try_from(p: DelegatesPageResponse) -> Result<Self, Self::Error> {
        let results = p
            .results
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                DelegateRecord::try_from(r).map_err(|e| match e {
                    HttpError::Decode(msg) => {
                        HttpError::Decode(format!("results[{}]: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            count: p.count,
            next: p.next,
            previous: p.previous,
            results,
        })
    }
}
