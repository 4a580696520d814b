//! HTTP transport seam.
//!
//! Every upstream call in both pipelines goes through a [`Transport`]. The
//! default is [`ReqwestTransport`]; a pre-built transport can be injected via
//! [`crate::config::LookupConfigBuilder::transport`], which is how the
//! integration tests serve canned responses.
//!
//! A transport reports the status it received and nothing more. Whether a
//! 404 is a failure or the trigger for a fallback is decided by the caller.

use crate::error::CivicError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Raw upstream answer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET. No retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, CivicError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CivicError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| CivicError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, CivicError> {
        debug!("GET {}", url);
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                CivicError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                CivicError::RequestFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_err)?.to_vec();
        debug!("GET {} → {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}

/// GET, failing on any non-success status.
pub async fn get_bytes(transport: &dyn Transport, url: &str) -> Result<Vec<u8>, CivicError> {
    let response = transport.get(url).await?;
    if !response.is_success() {
        return Err(CivicError::UpstreamUnavailable {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(response.body)
}

/// GET a text body (lossy UTF-8).
pub async fn get_text(transport: &dyn Transport, url: &str) -> Result<String, CivicError> {
    let body = get_bytes(transport, url).await?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Decode a JSON body already fetched from `url`.
pub fn decode_json<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, CivicError> {
    serde_json::from_slice(body).map_err(|e| CivicError::InvalidJson {
        url: url.to_string(),
        detail: e.to_string(),
    })
}

/// GET and decode a JSON body.
pub async fn get_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> Result<T, CivicError> {
    let body = get_bytes(transport, url).await?;
    decode_json(url, &body)
}
