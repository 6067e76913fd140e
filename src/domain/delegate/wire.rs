//! Wire types for the delegate registry (requests + responses).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::HttpError;

/// POST body for adding a delegate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDelegateRequest {
    pub safe: String,
    pub delegate: String,
    pub delegator: String,
    pub signature: String,
    pub label: String,
}

/// DELETE body for removing a delegate. The delegate itself is only in the
/// signed message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteDelegateRequest {
    pub safe: String,
    pub delegator: String,
    pub signature: String,
}

/// Query parameters for the list endpoint.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListDelegatesParams {
    pub safe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ListDelegatesParams {
    /// URL-encoded query string (no leading `?`).
    pub fn to_query_string(&self) -> Result<String, HttpError> {
        serde_urlencoded::to_string(self).map_err(|e| HttpError::Query(e.to_string()))
    }
}

/// A single record in a list response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelegateResponse {
    #[serde(default)]
    pub safe: Option<String>,
    pub delegate: String,
    pub delegator: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
}

/// Accept `null` where the registry normally sends a string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelegatesPageResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<DelegateResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_omits_unset_filters() {
        let params = ListDelegatesParams {
            safe: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_string().unwrap(),
            "safe=0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_query_string_encodes_label() {
        let params = ListDelegatesParams {
            safe: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
            label: Some("ops bot&co".to_string()),
            limit: Some(5),
            offset: Some(10),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_string().unwrap(),
            "safe=0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed&label=ops+bot%26co&limit=5&offset=10"
        );
    }

    #[test]
    fn test_page_deserializes_nulls() {
        let json = r#"{
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "safe": null,
                "delegate": "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
                "delegator": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826",
                "label": "bot"
            }]
        }"#;
        let page: DelegatesPageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 1);
        assert!(page.next.is_none());
        assert_eq!(page.results[0].safe, None);
        assert_eq!(page.results[0].label, "bot");
    }

    #[test]
    fn test_null_or_missing_label_is_empty() {
        let json = r#"[
            {"delegate": "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
             "delegator": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826",
             "label": null},
            {"delegate": "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
             "delegator": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"}
        ]"#;
        let records: Vec<DelegateResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].label, "");
        assert_eq!(records[1].label, "");
    }

    #[test]
    fn test_delete_body_has_no_delegate_or_label() {
        let body = DeleteDelegateRequest {
            safe: "0xs".to_string(),
            delegator: "0xd".to_string(),
            signature: "0xsig".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("delegate"));
        assert!(!obj.contains_key("label"));
    }
}
