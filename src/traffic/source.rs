//! Series sources.
//!
//! # Responsibilities
//! - Send the period and optional scope to a domain's aggregation endpoint
//! - Decode the reply into a [`SeriesBundle`]
//!
//! Two transports are supported: a form-encoded POST per domain, or the
//! matching RPC method through the invocation client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::Either;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{DashboardConfig, SourceKind};
use crate::rpc::{HttpTransport, MethodRegistry, RpcClient, RpcMethod, RpcRequest, RpcTransport, TransportError};
use crate::session::SessionAccessor;
use crate::traffic::types::{MetricDomain, Period, SeriesBundle};

/// Why a bundle could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("rpc error: {0}")]
    Rpc(String),
}

/// Form fields of an aggregation query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficQuery {
    pub period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
}

/// Fetches one domain's series bundle.
pub trait SeriesSource: Send + Sync {
    fn fetch(
        &self,
        domain: MetricDomain,
        query: &TrafficQuery,
    ) -> impl Future<Output = Result<SeriesBundle, FetchError>> + Send;
}

/// POSTs `period` (and `pid`) as a form to `/traffic/{domain}`.
#[derive(Debug, Clone)]
pub struct HttpSeriesSource {
    client: Client,
    base_url: String,
}

impl HttpSeriesSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl SeriesSource for HttpSeriesSource {
    fn fetch(
        &self,
        domain: MetricDomain,
        query: &TrafficQuery,
    ) -> impl Future<Output = Result<SeriesBundle, FetchError>> + Send {
        let url = format!("{}{}", self.base_url, domain.endpoint());
        let request = self.client.post(url).form(query);

        async move {
            let resp = request.send().await.map_err(TransportError::from)?;
            let status = resp.status();
            let text = resp.text().await.map_err(TransportError::from)?;
            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body: text,
                }
                .into());
            }
            let bundle = serde_json::from_str(&text).map_err(TransportError::from)?;
            Ok(bundle)
        }
    }
}

/// RPC payload for the `TrafficRequests` method.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TrafficRequestsCall(pub TrafficQuery);

impl RpcRequest for TrafficRequestsCall {
    const METHOD: RpcMethod = RpcMethod::TrafficRequests;
    type Response = SeriesBundle;
}

/// RPC payload for the `TrafficFlows` method.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TrafficFlowsCall(pub TrafficQuery);

impl RpcRequest for TrafficFlowsCall {
    const METHOD: RpcMethod = RpcMethod::TrafficFlows;
    type Response = SeriesBundle;
}

/// Fetches bundles through the invocation client.
pub struct RpcSeriesSource<T> {
    client: Arc<RpcClient<T>>,
}

impl<T> RpcSeriesSource<T> {
    pub fn new(client: Arc<RpcClient<T>>) -> Self {
        Self { client }
    }
}

impl<T: RpcTransport + 'static> SeriesSource for RpcSeriesSource<T> {
    fn fetch(
        &self,
        domain: MetricDomain,
        query: &TrafficQuery,
    ) -> impl Future<Output = Result<SeriesBundle, FetchError>> + Send {
        let client = self.client.clone();
        let query = query.clone();

        async move {
            let result = match domain {
                MetricDomain::Requests => client.call(&TrafficRequestsCall(query)).await,
                MetricDomain::Flows => client.call(&TrafficFlowsCall(query)).await,
            };
            result.into_result().map_err(FetchError::Rpc)
        }
    }
}

/// The source selected by configuration.
pub enum ConfiguredSource {
    Http(HttpSeriesSource),
    Rpc(RpcSeriesSource<HttpTransport>),
}

impl ConfiguredSource {
    pub fn from_config(
        config: &DashboardConfig,
        session: Arc<dyn SessionAccessor>,
    ) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.api.request_timeout_secs);
        match config.traffic.source {
            SourceKind::Http => Ok(Self::Http(HttpSeriesSource::new(&config.api.base_url, timeout)?)),
            SourceKind::Rpc => {
                let transport = HttpTransport::new(&config.api.rpc_address, timeout)?;
                let registry = MethodRegistry::new(config.api.rpc_service.clone());
                let client = Arc::new(RpcClient::new(transport, registry, session));
                Ok(Self::Rpc(RpcSeriesSource::new(client)))
            }
        }
    }
}

impl SeriesSource for ConfiguredSource {
    fn fetch(
        &self,
        domain: MetricDomain,
        query: &TrafficQuery,
    ) -> impl Future<Output = Result<SeriesBundle, FetchError>> + Send {
        match self {
            Self::Http(source) => Either::Left(source.fetch(domain, query)),
            Self::Rpc(source) => Either::Right(source.fetch(domain, query)),
        }
    }
}
