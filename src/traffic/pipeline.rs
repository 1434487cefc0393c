//! Widget refresh.

use thiserror::Error;

use crate::observability::metrics;
use crate::traffic::source::{FetchError, SeriesSource, TrafficQuery};
use crate::traffic::types::Period;
use crate::traffic::widget::ChartWidget;

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The bundle replaced the widget's totals and chart.
    Applied,
    /// A newer fetch was issued meanwhile; the result was dropped.
    Stale,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{widget}: {source}")]
    Fetch {
        widget: String,
        #[source]
        source: FetchError,
    },
}

/// A refresh whose sequence number has been issued but whose fetch has not run.
#[derive(Debug, Clone)]
pub struct PendingRefresh {
    seq: u64,
    query: TrafficQuery,
}

impl PendingRefresh {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Fetches bundles and pushes them into widgets.
pub struct TrafficPipeline<S> {
    source: S,
}

impl<S: SeriesSource> TrafficPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `widget`'s domain for `period` and replace everything it shows.
    ///
    /// Failures mark the widget as failed and are returned; they never affect
    /// other widgets.
    pub async fn refresh(
        &self,
        widget: &ChartWidget,
        period: Period,
    ) -> Result<RefreshOutcome, PipelineError> {
        let pending = self.begin(widget, period);
        self.complete(widget, pending).await
    }

    /// Issue the widget's next sequence number. Ordering between refreshes of
    /// one widget is decided here, not by completion.
    pub fn begin(&self, widget: &ChartWidget, period: Period) -> PendingRefresh {
        let seq = widget.begin_fetch();
        tracing::debug!(widget = %widget.id(), domain = %widget.domain(), period = %period, seq, "Refreshing widget");
        PendingRefresh {
            seq,
            query: TrafficQuery {
                period,
                pid: widget.scope_id().map(str::to_string),
            },
        }
    }

    /// Perform the fetch issued by [`begin`](Self::begin) and apply it if still current.
    pub async fn complete(
        &self,
        widget: &ChartWidget,
        pending: PendingRefresh,
    ) -> Result<RefreshOutcome, PipelineError> {
        let PendingRefresh { seq, query } = pending;
        let domain = widget.domain();

        match self.source.fetch(domain, &query).await {
            Ok(bundle) => {
                if widget.apply(seq, &bundle, query.period) {
                    metrics::record_refresh(domain.as_str(), "applied");
                    Ok(RefreshOutcome::Applied)
                } else {
                    tracing::debug!(widget = %widget.id(), seq, latest = widget.latest_seq(), "Discarding stale bundle");
                    metrics::record_refresh(domain.as_str(), "stale");
                    Ok(RefreshOutcome::Stale)
                }
            }
            Err(e) => {
                if !widget.fail(seq, &e.to_string()) {
                    tracing::debug!(widget = %widget.id(), seq, error = %e, "Discarding stale failure");
                    metrics::record_refresh(domain.as_str(), "stale");
                    return Ok(RefreshOutcome::Stale);
                }
                metrics::record_refresh(domain.as_str(), "failed");
                Err(PipelineError::Fetch {
                    widget: widget.id().to_string(),
                    source: e,
                })
            }
        }
    }
}
