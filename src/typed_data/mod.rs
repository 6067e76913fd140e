//! EIP-712 typed data for the messages the registry expects delegate requests to sign.
//!
//! [`delegate_typed_data`] assembles the `Delegate` message; [`TypedData::hash`]
//! produces the 32-byte digest that gets signed. The JSON shape matches
//! `eth_signTypedData_v4`, so an envelope can also be handed to an external
//! wallet for signing.

pub mod hash;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SdkError;
use crate::network::{DOMAIN_NAME, DOMAIN_VERSION};
use crate::shared::{Address, TotpWindow};

pub use hash::{encode_type, hash_struct, typed_data_hash};

/// Name of the domain struct in every EIP-712 schema.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// Primary type of delegate add/remove messages.
pub const DELEGATE_TYPE: &str = "Delegate";

/// One `name: type` entry of a struct schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TypedField {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Struct schemas keyed by type name. Field order inside each schema is significant.
pub type Types = BTreeMap<String, Vec<TypedField>>;

/// The EIP-712 signing domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
}

impl TypedDataDomain {
    /// The domain the delegate registry verifies signatures against.
    pub fn safe_transaction_service(chain_id: u64) -> Self {
        Self {
            name: Some(DOMAIN_NAME.to_string()),
            version: Some(DOMAIN_VERSION.to_string()),
            chain_id: Some(chain_id),
            verifying_contract: None,
        }
    }

    /// Domain values keyed by EIP-712 field name, for struct hashing.
    pub(crate) fn to_message(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(name) = &self.name {
            map.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(version) = &self.version {
            map.insert("version".into(), Value::String(version.clone()));
        }
        if let Some(chain_id) = self.chain_id {
            map.insert("chainId".into(), Value::String(chain_id.to_string()));
        }
        if let Some(contract) = &self.verifying_contract {
            map.insert(
                "verifyingContract".into(),
                Value::String(contract.to_checksum()),
            );
        }
        map
    }
}

/// A complete typed-data envelope: schemas, domain, primary type and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: Types,
    pub primary_type: String,
    pub domain: TypedDataDomain,
    pub message: Map<String, Value>,
}

impl TypedData {
    /// `keccak256(0x19 0x01 ‖ domainSeparator ‖ hashStruct(message))`.
    pub fn hash(&self) -> Result<[u8; 32], SdkError> {
        typed_data_hash(self)
    }

    /// `hashStruct(EIP712Domain, domain)`.
    pub fn domain_separator(&self) -> Result<[u8; 32], SdkError> {
        hash_struct(&self.types, EIP712_DOMAIN_TYPE, &self.domain.to_message())
    }
}

/// Schemas for the delegate message: the registry's domain plus `Delegate`.
pub fn delegate_types() -> Types {
    let mut types = Types::new();
    types.insert(
        EIP712_DOMAIN_TYPE.to_string(),
        vec![
            TypedField::new("name", "string"),
            TypedField::new("version", "string"),
            TypedField::new("chainId", "uint256"),
        ],
    );
    types.insert(
        DELEGATE_TYPE.to_string(),
        vec![
            TypedField::new("delegateAddress", "address"),
            TypedField::new("totp", "uint256"),
        ],
    );
    types
}

/// Build the `Delegate` typed data signed for both adding and removing a delegate.
///
/// `delegate_address` is normalized to checksum case; `totp` is carried as a
/// decimal string and re-encoded as `uint256` when hashed.
pub fn delegate_typed_data(
    delegate_address: &str,
    totp: TotpWindow,
    chain_id: u64,
) -> Result<TypedData, SdkError> {
    let delegate = Address::parse(delegate_address)?;

    let mut message = Map::new();
    message.insert(
        "delegateAddress".into(),
        Value::String(delegate.to_checksum()),
    );
    message.insert("totp".into(), Value::String(totp.to_string()));

    Ok(TypedData {
        types: delegate_types(),
        primary_type: DELEGATE_TYPE.to_string(),
        domain: TypedDataDomain::safe_transaction_service(chain_id),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegate_typed_data_shape() {
        let td = delegate_typed_data(
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            TotpWindow::from_value(480_000),
            1,
        )
        .unwrap();

        assert_eq!(td.primary_type, "Delegate");
        assert_eq!(td.domain.name.as_deref(), Some("Safe Transaction Service"));
        assert_eq!(td.domain.version.as_deref(), Some("1.0"));
        assert_eq!(td.domain.chain_id, Some(1));
        assert_eq!(
            td.message["delegateAddress"],
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
        assert_eq!(td.message["totp"], "480000");

        let delegate_fields: Vec<_> = td.types["Delegate"]
            .iter()
            .map(|f| (f.name.as_str(), f.kind.as_str()))
            .collect();
        assert_eq!(
            delegate_fields,
            [("delegateAddress", "address"), ("totp", "uint256")]
        );
    }

    #[test]
    fn test_delegate_typed_data_rejects_bad_address() {
        let err = delegate_typed_data("0x1234", TotpWindow::from_value(1), 1).unwrap_err();
        assert!(matches!(err, SdkError::InvalidAddress(_)));
    }

    #[test]
    fn test_typed_data_json_matches_sign_typed_data_v4() {
        let td = delegate_typed_data(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            TotpWindow::from_value(7),
            100,
        )
        .unwrap();
        let json = serde_json::to_value(&td).unwrap();
        assert_eq!(json["primaryType"], "Delegate");
        assert_eq!(json["domain"]["chainId"], 100);
        assert!(json["domain"].get("verifyingContract").is_none());
        assert_eq!(json["types"]["EIP712Domain"][2]["type"], "uint256");

        let back: TypedData = serde_json::from_value(json).unwrap();
        assert_eq!(back, td);
    }
}
