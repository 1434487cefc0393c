//! Dashboard page driver.
//!
//! # Data Flow
//! ```text
//! start()                 → one refresh task per widget at the current period
//! set_period(p)           → PeriodState publishes
//!                         → WidgetRefresher spawns one refresh per widget
//! refresh task completes  → widget applies (or discards) its own bundle
//! ```
//!
//! # Design Decisions
//! - Every refresh is its own tokio task; a failing widget never blocks others
//! - Nothing is cancelled; stale completions are dropped by the widget's sequence check

use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;

use crate::config::schema::DashboardConfig;
use crate::render::{LabelSurface, WidgetSurface};
use crate::traffic::period::{PeriodState, PeriodSubscriber, SelectorLabel};
use crate::traffic::pipeline::TrafficPipeline;
use crate::traffic::source::SeriesSource;
use crate::traffic::types::Period;
use crate::traffic::widget::{ChartWidget, WidgetState};

type Tasks = Arc<Mutex<JoinSet<()>>>;

fn spawn_refresh<S: SeriesSource + 'static>(
    tasks: &Tasks,
    pipeline: Arc<TrafficPipeline<S>>,
    widget: Arc<ChartWidget>,
    period: Period,
) {
    let pending = pipeline.begin(&widget, period);
    let mut tasks = tasks.lock().expect("dashboard task mutex poisoned");
    while let Some(res) = tasks.try_join_next() {
        if let Err(e) = res {
            tracing::error!(error = %e, "Refresh task panicked");
        }
    }
    tasks.spawn(async move {
        if let Err(e) = pipeline.complete(&widget, pending).await {
            tracing::warn!(widget = %widget.id(), error = %e, "Widget refresh failed");
        }
    });
}

/// Refetches one widget whenever the period changes.
struct WidgetRefresher<S> {
    pipeline: Arc<TrafficPipeline<S>>,
    widget: Arc<ChartWidget>,
    tasks: Tasks,
}

impl<S: SeriesSource + 'static> PeriodSubscriber for WidgetRefresher<S> {
    fn on_period_change(&self, period: Period) {
        spawn_refresh(&self.tasks, self.pipeline.clone(), self.widget.clone(), period);
    }
}

pub struct Dashboard<S> {
    period: Arc<PeriodState>,
    pipeline: Arc<TrafficPipeline<S>>,
    widgets: Vec<Arc<ChartWidget>>,
    tasks: Tasks,
}

impl<S: SeriesSource + 'static> Dashboard<S> {
    pub fn new(source: S, initial: Period) -> Self {
        Self {
            period: Arc::new(PeriodState::new(initial)),
            pipeline: Arc::new(TrafficPipeline::new(source)),
            widgets: Vec::new(),
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Build every configured widget, asking `surface_for` for its render targets.
    pub fn from_config(
        source: S,
        config: &DashboardConfig,
        mut surface_for: impl FnMut(&str) -> Arc<dyn WidgetSurface>,
    ) -> Self {
        let mut dashboard = Self::new(source, config.traffic.default_period);
        for widget in config.effective_widgets() {
            let scope = widget.scope_id.or_else(|| config.traffic.scope_id.clone());
            let surface = surface_for(&widget.id);
            dashboard.add_widget(ChartWidget::new(widget.id, widget.domain, scope, surface));
        }
        dashboard
    }

    /// Register a widget; it will refetch on every period change.
    pub fn add_widget(&mut self, widget: ChartWidget) -> Arc<ChartWidget> {
        let widget = Arc::new(widget);
        self.period.subscribe(Arc::new(WidgetRefresher {
            pipeline: self.pipeline.clone(),
            widget: widget.clone(),
            tasks: self.tasks.clone(),
        }));
        self.widgets.push(widget.clone());
        widget
    }

    /// Attach the period selector label and show the current period on it.
    pub fn bind_period_label(&self, label: Arc<dyn LabelSurface>) {
        label.set_label(self.period.current().label());
        self.period.subscribe(Arc::new(SelectorLabel(label)));
    }

    pub fn widgets(&self) -> &[Arc<ChartWidget>] {
        &self.widgets
    }

    pub fn period(&self) -> Period {
        self.period.current()
    }

    pub fn period_state(&self) -> &Arc<PeriodState> {
        &self.period
    }

    /// Initial load: refresh every widget at the current period.
    pub fn start(&self) {
        let period = self.period.current();
        tracing::info!(widgets = self.widgets.len(), period = %period, "Loading dashboard");
        for widget in &self.widgets {
            spawn_refresh(&self.tasks, self.pipeline.clone(), widget.clone(), period);
        }
    }

    /// Period selector action. Returns false when `period` is already active.
    pub fn set_period(&self, period: Period) -> bool {
        self.period.set_period(period)
    }

    /// Refresh every widget currently in the failed state. Returns how many were retried.
    pub fn retry_failed(&self) -> usize {
        let period = self.period.current();
        let failed: Vec<_> = self
            .widgets
            .iter()
            .filter(|w| matches!(w.state(), WidgetState::Failed(_)))
            .cloned()
            .collect();
        for widget in &failed {
            tracing::info!(widget = %widget.id(), "Retrying failed widget");
            spawn_refresh(&self.tasks, self.pipeline.clone(), widget.clone(), period);
        }
        failed.len()
    }

    /// Wait until every spawned refresh has completed.
    pub async fn settle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.tasks.lock().expect("dashboard task mutex poisoned"));
            if tasks.is_empty() {
                return;
            }
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    tracing::error!(error = %e, "Refresh task panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MemoryLabel, MemorySurface};
    use crate::traffic::source::{FetchError, TrafficQuery};
    use crate::traffic::types::{MetricDomain, SeriesBundle};
    use std::collections::HashMap;
    use std::future::Future;
    use std::time::Duration;

    /// Replies per domain after a per-period delay.
    #[derive(Default)]
    struct ScriptedSource {
        calls: Mutex<Vec<(MetricDomain, Period)>>,
        failing: Mutex<Vec<MetricDomain>>,
        delays: HashMap<Period, u64>,
    }

    impl SeriesSource for ScriptedSource {
        fn fetch(
            &self,
            domain: MetricDomain,
            query: &TrafficQuery,
        ) -> impl Future<Output = Result<SeriesBundle, FetchError>> + Send {
            let period = query.period;
            self.calls.lock().unwrap().push((domain, period));
            let fail = self.failing.lock().unwrap().contains(&domain);
            let delay = Duration::from_millis(self.delays.get(&period).copied().unwrap_or(0));

            async move {
                tokio::time::sleep(delay).await;
                if fail {
                    return Err(FetchError::Rpc("boom".to_string()));
                }
                let total = if period == Period::OneDay { 1 } else { 7 };
                let raw = format!(
                    r#"{{"typ-success": {{"total": {t}}}, "typ-main_out_bytes": {{"total": {t}}}}}"#,
                    t = total
                );
                Ok(serde_json::from_str(&raw).unwrap())
            }
        }
    }

    fn dashboard(source: ScriptedSource) -> (Dashboard<ScriptedSource>, Vec<Arc<MemorySurface>>) {
        let mut dashboard = Dashboard::new(source, Period::OneDay);
        let mut surfaces = Vec::new();
        for domain in MetricDomain::ALL {
            let surface = Arc::new(MemorySurface::new());
            dashboard.add_widget(ChartWidget::new(domain.as_str(), domain, None, surface.clone()));
            surfaces.push(surface);
        }
        (dashboard, surfaces)
    }

    #[tokio::test]
    async fn test_start_refreshes_every_widget() {
        let (dashboard, surfaces) = dashboard(ScriptedSource::default());
        dashboard.start();
        dashboard.settle().await;

        assert_eq!(dashboard.pipeline.source().calls.lock().unwrap().len(), 2);
        assert_eq!(surfaces[0].snapshot().totals[0], "1");
        assert_eq!(surfaces[1].snapshot().totals[0], "1.00iB");
    }

    #[tokio::test]
    async fn test_same_period_does_not_refetch() {
        let (dashboard, _) = dashboard(ScriptedSource::default());
        assert!(!dashboard.set_period(Period::OneDay));
        dashboard.settle().await;
        assert!(dashboard.pipeline.source().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_period_change_refreshes_each_widget_once() {
        let (dashboard, surfaces) = dashboard(ScriptedSource::default());
        let label = Arc::new(MemoryLabel::default());
        dashboard.bind_period_label(label.clone());
        assert_eq!(label.text(), "1 Day");

        assert!(dashboard.set_period(Period::SevenDays));
        dashboard.settle().await;

        let calls = dashboard.pipeline.source().calls.lock().unwrap().clone();
        assert_eq!(
            calls.iter().filter(|(_, p)| *p == Period::SevenDays).count(),
            2
        );
        assert_eq!(calls.len(), 2);
        assert_eq!(label.text(), "7 Days");
        assert_eq!(surfaces[0].snapshot().totals[0], "7");
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let source = ScriptedSource::default();
        source.failing.lock().unwrap().push(MetricDomain::Requests);
        let (dashboard, surfaces) = dashboard(source);

        dashboard.start();
        dashboard.settle().await;

        assert!(matches!(dashboard.widgets()[0].state(), WidgetState::Failed(_)));
        assert_eq!(dashboard.widgets()[1].state(), WidgetState::Ready);
        assert_eq!(surfaces[0].snapshot().error.as_deref(), Some("rpc error: boom"));

        dashboard.pipeline.source().failing.lock().unwrap().clear();
        assert_eq!(dashboard.retry_failed(), 1);
        dashboard.settle().await;
        assert_eq!(dashboard.widgets()[0].state(), WidgetState::Ready);
    }

    #[tokio::test]
    async fn test_finished_refreshes_are_reaped() {
        let (dashboard, _) = dashboard(ScriptedSource::default());
        for period in [Period::SevenDays, Period::OneDay].repeat(10) {
            assert!(dashboard.set_period(period));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(dashboard.tasks.lock().unwrap().len() <= dashboard.widgets().len());
        dashboard.settle().await;
        assert_eq!(dashboard.pipeline.source().calls.lock().unwrap().len(), 40);
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_dropped() {
        let source = ScriptedSource {
            delays: HashMap::from([(Period::OneDay, 200), (Period::SevenDays, 10)]),
            ..Default::default()
        };
        let (dashboard, surfaces) = dashboard(source);

        dashboard.start();
        dashboard.set_period(Period::SevenDays);
        dashboard.settle().await;

        let snap = surfaces[0].snapshot();
        assert_eq!(snap.totals[0], "7");
        assert_eq!(snap.renders, 1);
        assert_eq!(snap.chart.unwrap().period, Period::SevenDays);
    }
}
