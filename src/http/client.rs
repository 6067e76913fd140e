//! Low-level HTTP client — `RegistryHttp`.
//!
//! One method per registry verb. Takes and returns wire types (conversion to
//! domain types happens in the delegate slice). Each call names the statuses it
//! accepts; anything else becomes [`HttpError::RegistryRejected`] with the body
//! kept verbatim.

use crate::error::{HttpError, SdkError};

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default timeout for every registry and RPC request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the delegate registry.
#[derive(Clone)]
pub struct RegistryHttp {
    client: Client,
}

impl RegistryHttp {
    pub fn new(timeout: Duration) -> Result<Self, SdkError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(HttpError::from)?;
        Ok(Self { client })
    }

    /// The underlying reqwest client (shared with JSON-RPC calls).
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    // ── Registry verbs ───────────────────────────────────────────────────

    /// POST a JSON body. The response body is not interpreted.
    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> Result<StatusCode, HttpError> {
        let resp = self.send(Method::POST, url, Some(body)).await?;
        Self::check(resp, accepted).await.map(|(status, _)| status)
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        accepted: &[StatusCode],
    ) -> Result<T, HttpError> {
        let resp = self.send(Method::GET, url, None::<&()>).await?;
        let (_, body) = Self::check(resp, accepted).await?;
        serde_json::from_str(&body).map_err(|e| HttpError::Decode(format!("{}: {}", e, body)))
    }

    /// DELETE with a JSON body. The response body is not interpreted.
    pub async fn delete_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> Result<StatusCode, HttpError> {
        let resp = self.send(Method::DELETE, url, Some(body)).await?;
        Self::check(resp, accepted).await.map(|(status, _)| status)
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, HttpError> {
        tracing::debug!(%method, "Registry request to {}", url);
        let mut req = self.client.request(method, url);
        if let Some(b) = body {
            req = req.json(b);
        }
        Ok(req.send().await?)
    }

    async fn check(
        resp: reqwest::Response,
        accepted: &[StatusCode],
    ) -> Result<(StatusCode, String), HttpError> {
        let status = resp.status();
        let body = resp.text().await?;

        if accepted.contains(&status) {
            tracing::debug!(status = status.as_u16(), "Registry accepted request");
            return Ok((status, body));
        }

        tracing::debug!(status = status.as_u16(), "Registry rejected request");
        Err(HttpError::RegistryRejected {
            status: status.as_u16(),
            body,
        })
    }
}
