//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::traffic::types::{MetricDomain, Period};

/// Root configuration for the dashboard client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend endpoints.
    pub api: ApiConfig,

    /// Locally stored session, if any.
    pub session: SessionConfig,

    /// Traffic pipeline settings.
    pub traffic: TrafficConfig,

    /// Chart widgets created at startup.
    pub widgets: Vec<WidgetConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the dashboard HTTP endpoints (e.g., "http://127.0.0.1:38779").
    pub base_url: String,

    /// Address of the RPC service.
    pub rpc_address: String,

    /// Fully qualified RPC service name used to build method paths.
    pub rpc_service: String,

    /// Transport-level request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:38779".to_string(),
            rpc_address: "http://127.0.0.1:38779".to_string(),
            rpc_service: "moni.MoniRpcService".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Session seeded into the in-memory accessor at startup.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub email: Option<String>,
    pub access_token: Option<String>,
}

/// Which transport the traffic pipeline uses.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Form-encoded POST to the traffic endpoints.
    #[default]
    Http,
    /// Named RPC methods through the invocation client.
    Rpc,
}

/// Traffic pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrafficConfig {
    /// Period selected when the dashboard starts.
    pub default_period: Period,

    /// Transport used to fetch series bundles.
    pub source: SourceKind,

    /// Scope identifier applied to widgets that do not set their own.
    pub scope_id: Option<String>,
}

/// One chart widget.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetConfig {
    /// Stable identifier of the widget's render targets.
    pub id: String,

    /// Metric domain shown by the widget.
    pub domain: MetricDomain,

    /// Optional scope identifier (e.g., project id).
    #[serde(default)]
    pub scope_id: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Widgets to build, falling back to one widget per domain.
    pub fn effective_widgets(&self) -> Vec<WidgetConfig> {
        if !self.widgets.is_empty() {
            return self.widgets.clone();
        }
        MetricDomain::ALL
            .iter()
            .map(|domain| WidgetConfig {
                id: domain.as_str().to_string(),
                domain: *domain,
                scope_id: None,
            })
            .collect()
    }
}
