use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use traffic_dashboard::format::format_byte_size;
use traffic_dashboard::rpc::{HttpTransport, MethodRegistry, RpcCallResult, RpcClient};
use traffic_dashboard::session::{LocalUser, MemorySession, SessionAccessor};
use traffic_dashboard::traffic::{
    ChartSpec, HttpSeriesSource, MetricDomain, Period, RpcSeriesSource, SeriesSource, TrafficQuery,
};

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "One-shot calls against the dashboard backend", long_about = None)]
struct Cli {
    /// Base URL of the traffic endpoints.
    #[arg(short, long, default_value = "http://127.0.0.1:38779")]
    url: String,

    /// Address of the RPC service.
    #[arg(long, default_value = "http://127.0.0.1:38779")]
    rpc_address: String,

    /// Fully qualified RPC service name.
    #[arg(long, default_value = "moni.MoniRpcService")]
    service: String,

    /// Bearer token sent with RPC calls.
    #[arg(short, long)]
    token: Option<String>,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call an RPC method by name with a JSON body
    Invoke {
        method: String,
        #[arg(short, long, default_value = "{}")]
        body: String,
    },
    /// Fetch one traffic series bundle
    Traffic {
        #[arg(short, long, default_value = "requests")]
        domain: MetricDomain,
        #[arg(short, long, default_value = "1d")]
        period: Period,
        /// Scope identifier (project id).
        #[arg(long)]
        pid: Option<String>,
        /// Fetch through the RPC method instead of the form endpoint.
        #[arg(long)]
        rpc: bool,
        /// Print the chart option as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Format a byte count
    Bytes {
        value: f64,
        #[arg(long)]
        byte_unit: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    traffic_dashboard::observability::logging::init(&Default::default());
    let timeout = Duration::from_secs(cli.timeout_secs);

    let session: Arc<dyn SessionAccessor> = Arc::new(MemorySession::new(cli.token.map(|token| LocalUser {
        email: None,
        access_token: Some(token),
    })));
    let rpc = || -> Result<RpcClient<HttpTransport>, Box<dyn std::error::Error>> {
        let transport = HttpTransport::new(&cli.rpc_address, timeout)?;
        Ok(RpcClient::new(transport, MethodRegistry::new(cli.service.clone()), session.clone()))
    };

    match cli.command {
        Commands::Invoke { ref method, ref body } => {
            let body: Value = serde_json::from_str(body)?;
            let result = rpc()?.invoke(method, &body).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if let RpcCallResult::Err(_) = result {
                std::process::exit(1);
            }
        }
        Commands::Traffic { domain, period, ref pid, rpc: via_rpc, json } => {
            let query = TrafficQuery { period, pid: pid.clone() };
            let bundle = if via_rpc {
                RpcSeriesSource::new(Arc::new(rpc()?)).fetch(domain, &query).await?
            } else {
                HttpSeriesSource::new(&cli.url, timeout)?.fetch(domain, &query).await?
            };

            let chart = ChartSpec::from_bundle(domain, &bundle, period);
            if json {
                println!("{}", serde_json::to_string_pretty(&chart.to_option())?);
                return Ok(());
            }

            let layout = domain.layout();
            for (key, series) in layout.keys.iter().zip(&chart.series) {
                let total = bundle.total(key);
                let total = if layout.byte_totals {
                    format_byte_size(total, true)
                } else {
                    total.to_string()
                };
                println!("{:<8} total {:>12}  points {}", series.name, total, series.data.len());
            }
            println!("ticks: {}", chart.axis_labels().join(" | "));
        }
        Commands::Bytes { value, byte_unit } => {
            println!("{}", format_byte_size(value, byte_unit));
        }
    }

    Ok(())
}
