//! Unary call transport.
//!
//! The wire encoding is owned by the transport; the client only hands it a
//! path, a metadata map and a JSON payload.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Per-call metadata, sent as headers.
pub type CallMetadata = BTreeMap<String, String>;

/// Errors raised by a transport while executing a call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid metadata '{0}'")]
    Metadata(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Executes one unary call.
pub trait RpcTransport: Send + Sync {
    fn unary_call(
        &self,
        path: &str,
        metadata: &CallMetadata,
        request: Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// JSON-over-HTTP transport: POST `{address}{path}` with metadata as headers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    address: String,
}

impl HttpTransport {
    pub fn new(address: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, address))
    }

    pub fn with_client(client: Client, address: &str) -> Self {
        Self {
            client,
            address: address.trim_end_matches('/').to_string(),
        }
    }

    fn headers(metadata: &CallMetadata) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (key, value) in metadata {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| TransportError::Metadata(key.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| TransportError::Metadata(key.clone()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl RpcTransport for HttpTransport {
    fn unary_call(
        &self,
        path: &str,
        metadata: &CallMetadata,
        request: Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        let url = format!("{}{}", self.address, path);
        let headers = Self::headers(metadata);
        let client = self.client.clone();

        async move {
            let resp = client.post(url).headers(headers?).json(&request).send().await?;

            let status = resp.status();
            let text = resp.text().await?;
            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body: text,
                });
            }

            Ok(serde_json::from_str(&text)?)
        }
    }
}
