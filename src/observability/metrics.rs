//! Client-side counters.
//!
//! # Metrics
//! - `dashboard_rpc_calls_total` (counter): calls by method, outcome
//! - `dashboard_refresh_total` (counter): widget refreshes by domain, outcome
//!
//! The runner installs a Prometheus recorder and prints its text
//! exposition on demand; without a recorder the counters are no-ops.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Record one finished RPC call.
pub fn record_rpc_call(method: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!(
        "dashboard_rpc_calls_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one widget refresh. `outcome` is "applied", "stale" or "failed".
pub fn record_refresh(domain: &str, outcome: &'static str) {
    counter!(
        "dashboard_refresh_total",
        "domain" => domain.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of the exposition line for `name` carrying every label in `labels`.
    fn sample(rendered: &str, name: &str, labels: &[&str]) -> Option<u64> {
        rendered
            .lines()
            .filter(|line| line.starts_with(&format!("{}{{", name)))
            .find(|line| labels.iter().all(|label| line.contains(label)))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }

    #[test]
    fn test_counters_increment() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            record_rpc_call("CreateProject", true);
            record_rpc_call("CreateProject", true);
            record_rpc_call("LoginEmail", false);
            record_refresh("requests", "applied");
            record_refresh("requests", "stale");
            record_refresh("flows", "failed");
        });

        let rendered = handle.render();
        let rpc = "dashboard_rpc_calls_total";
        let refresh = "dashboard_refresh_total";
        assert_eq!(sample(&rendered, rpc, &["method=\"CreateProject\"", "outcome=\"ok\""]), Some(2));
        assert_eq!(sample(&rendered, rpc, &["method=\"LoginEmail\"", "outcome=\"error\""]), Some(1));
        assert_eq!(sample(&rendered, refresh, &["domain=\"requests\"", "outcome=\"applied\""]), Some(1));
        assert_eq!(sample(&rendered, refresh, &["domain=\"requests\"", "outcome=\"stale\""]), Some(1));
        assert_eq!(sample(&rendered, refresh, &["domain=\"flows\"", "outcome=\"failed\""]), Some(1));
        assert_eq!(sample(&rendered, refresh, &["domain=\"flows\"", "outcome=\"applied\""]), None);
    }
}
