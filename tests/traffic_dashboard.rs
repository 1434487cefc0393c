//! Dashboard scenarios against a mock traffic backend.

use std::sync::Arc;
use std::time::Duration;

use traffic_dashboard::config::parse_config;
use traffic_dashboard::render::{MemoryLabel, MemorySurface, WidgetSurface};
use traffic_dashboard::session::MemorySession;
use traffic_dashboard::traffic::{
    ChartWidget, ConfiguredSource, Dashboard, HttpSeriesSource, MetricDomain, Period, WidgetState,
};

mod common;

fn http_source(url: &str) -> HttpSeriesSource {
    HttpSeriesSource::new(url, Duration::from_secs(5)).unwrap()
}

fn traffic_backend(hit: &common::Hit) -> (u16, String) {
    match hit.path.as_str() {
        "/traffic/requests" => (200, common::REQUESTS_BUNDLE.to_string()),
        "/traffic/flows" => (200, common::FLOWS_BUNDLE.to_string()),
        _ => (404, "not found".to_string()),
    }
}

#[tokio::test]
async fn test_initial_load_renders_both_domains() {
    let backend = common::start_mock_backend(traffic_backend).await;
    let mut dashboard = Dashboard::new(http_source(&backend.url()), Period::OneDay);

    let requests = Arc::new(MemorySurface::new());
    let flows = Arc::new(MemorySurface::new());
    dashboard.add_widget(ChartWidget::new("requests", MetricDomain::Requests, None, requests.clone()));
    dashboard.add_widget(ChartWidget::new("flows", MetricDomain::Flows, None, flows.clone()));

    dashboard.start();
    dashboard.settle().await;

    let snap = requests.snapshot();
    assert!(!snap.loading);
    assert!(snap.totals_visible);
    assert_eq!(snap.totals, ["42".to_string(), "0".to_string()]);
    let chart = snap.chart.unwrap();
    assert_eq!(chart.series[0].name, "success");
    assert_eq!(chart.series[0].data.len(), 2);
    assert!(chart.series[1].data.is_empty());
    assert_eq!(chart.colors, ["#5470c6", "#B03A5B"]);

    let snap = flows.snapshot();
    assert_eq!(snap.totals, ["1.50MiB".to_string(), "2.50KiB".to_string()]);

    let hits = backend.hits();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.body == "period=1d"));
    assert!(hits
        .iter()
        .all(|h| h.headers["content-type"] == "application/x-www-form-urlencoded"));
}

#[tokio::test]
async fn test_period_change_refetches_with_scope() {
    let backend = common::start_mock_backend(traffic_backend).await;
    let mut dashboard = Dashboard::new(http_source(&backend.url()), Period::OneDay);
    let surface = Arc::new(MemorySurface::new());
    dashboard.add_widget(ChartWidget::new(
        "project-requests",
        MetricDomain::Requests,
        Some("17".to_string()),
        surface.clone(),
    ));
    let label = Arc::new(MemoryLabel::default());
    dashboard.bind_period_label(label.clone());

    dashboard.start();
    dashboard.settle().await;

    assert!(!dashboard.set_period(Period::OneDay));
    assert!(dashboard.set_period(Period::SevenDays));
    dashboard.settle().await;

    let bodies: Vec<String> = backend.hits().into_iter().map(|h| h.body).collect();
    assert_eq!(bodies, vec!["period=1d&pid=17", "period=7d&pid=17"]);
    assert_eq!(label.text(), "7 Days");
    assert_eq!(surface.snapshot().chart.unwrap().period, Period::SevenDays);
    assert_eq!(surface.snapshot().renders, 2);
}

#[tokio::test]
async fn test_failing_endpoint_only_fails_its_widget() {
    let backend = common::start_mock_backend(|hit| match hit.path.as_str() {
        "/traffic/requests" => (500, "database unavailable".to_string()),
        _ => (200, common::FLOWS_BUNDLE.to_string()),
    })
    .await;
    let mut dashboard = Dashboard::new(http_source(&backend.url()), Period::OneDay);
    let requests = Arc::new(MemorySurface::new());
    let flows = Arc::new(MemorySurface::new());
    dashboard.add_widget(ChartWidget::new("requests", MetricDomain::Requests, None, requests.clone()));
    dashboard.add_widget(ChartWidget::new("flows", MetricDomain::Flows, None, flows.clone()));

    dashboard.start();
    dashboard.settle().await;

    assert!(matches!(dashboard.widgets()[0].state(), WidgetState::Failed(_)));
    assert_eq!(
        requests.snapshot().error.as_deref(),
        Some("remote returned status 500: database unavailable")
    );
    assert!(!requests.snapshot().totals_visible);

    assert_eq!(dashboard.widgets()[1].state(), WidgetState::Ready);
    assert!(flows.snapshot().totals_visible);
}

#[tokio::test]
async fn test_dashboard_from_config() {
    let backend = common::start_mock_backend(traffic_backend).await;
    let raw = format!(
        r#"
        [api]
        base_url = "{url}"

        [traffic]
        default_period = "7d"
        scope_id = "3"

        [[widgets]]
        id = "flows-main"
        domain = "flows"
        "#,
        url = backend.url()
    );
    let config = parse_config(&raw).unwrap();
    let session = Arc::new(MemorySession::from_config(&config.session));
    let source = ConfiguredSource::from_config(&config, session).unwrap();

    let mut surfaces = Vec::new();
    let dashboard = Dashboard::from_config(source, &config, |id| {
        let surface = Arc::new(MemorySurface::new());
        surfaces.push((id.to_string(), surface.clone()));
        surface as Arc<dyn WidgetSurface>
    });
    dashboard.start();
    dashboard.settle().await;

    assert_eq!(dashboard.period(), Period::SevenDays);
    assert_eq!(surfaces.len(), 1);
    assert_eq!(surfaces[0].0, "flows-main");
    assert_eq!(surfaces[0].1.snapshot().totals[0], "1.50MiB");

    let hits = backend.hits();
    assert_eq!(hits[0].path, "/traffic/flows");
    assert_eq!(hits[0].body, "period=7d&pid=3");
}
