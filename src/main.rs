//! Traffic dashboard runner.
//!
//! Loads every configured chart widget, prints their totals, then reads
//! period selections from stdin:
//!
//! ```text
//! 1d | 7d   select a period (no-op if already active)
//! retry     refetch widgets that failed
//! show      print the current state again
//! metrics   print call and refresh counters
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

use traffic_dashboard::config::{load_config, DashboardConfig};
use traffic_dashboard::observability::{logging, metrics};
use traffic_dashboard::render::{MemoryLabel, MemorySurface, WidgetSurface};
use traffic_dashboard::session::MemorySession;
use traffic_dashboard::traffic::{ConfiguredSource, Dashboard, Period};

#[derive(Parser)]
#[command(name = "traffic-dashboard")]
#[command(about = "Request and byte-flow charts for the dashboard backend", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bearer token, overriding the configured session.
    #[arg(short, long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(token) = args.token {
        config.session.access_token = Some(token);
    }

    logging::init(&config.observability);
    let metrics_handle = metrics::init_metrics();
    tracing::info!(
        base_url = %config.api.base_url,
        source = ?config.traffic.source,
        "traffic-dashboard v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let session = Arc::new(MemorySession::from_config(&config.session));
    let source = ConfiguredSource::from_config(&config, session)?;

    let mut surfaces = Vec::new();
    let dashboard = Dashboard::from_config(source, &config, |id| {
        let surface = Arc::new(MemorySurface::new());
        surfaces.push((id.to_string(), surface.clone()));
        surface as Arc<dyn WidgetSurface>
    });
    let label = Arc::new(MemoryLabel::default());
    dashboard.bind_period_label(label.clone());

    dashboard.start();
    dashboard.settle().await;
    print_widgets(&label, &surfaces);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => continue,
                    "show" => {}
                    "metrics" => {
                        match &metrics_handle {
                            Some(handle) => print!("{}", handle.render()),
                            None => eprintln!("metrics recorder unavailable"),
                        }
                        continue;
                    }
                    "retry" => {
                        let retried = dashboard.retry_failed();
                        tracing::info!(retried, "Retry requested");
                    }
                    other => match other.parse::<Period>() {
                        Ok(period) => {
                            if !dashboard.set_period(period) {
                                println!("period {} already selected", period);
                                continue;
                            }
                        }
                        Err(e) => {
                            eprintln!("{}", e);
                            continue;
                        }
                    },
                }
                dashboard.settle().await;
                print_widgets(&label, &surfaces);
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_widgets(label: &MemoryLabel, surfaces: &[(String, Arc<MemorySurface>)]) {
    println!("[{}]", label.text());
    for (id, surface) in surfaces {
        let snap = surface.snapshot();
        if let Some(error) = &snap.error {
            println!("  {:<12} error: {}", id, error);
            continue;
        }
        let Some(chart) = &snap.chart else {
            println!("  {:<12} loading", id);
            continue;
        };
        println!(
            "  {:<12} {} {}  {} {}  ticks: {}",
            id,
            chart.series[0].name,
            snap.totals[0],
            chart.series[1].name,
            snap.totals[1],
            chart.axis_labels().join(" | ")
        );
    }
}
