//! Traffic series subsystem.
//!
//! # Data Flow
//! ```text
//! period selector
//!     → period.rs (PeriodState, publishes only on change)
//!     → dashboard.rs (one refresh task per widget)
//!     → pipeline.rs (begin: sequence number, complete: fetch + apply)
//!     → source.rs (form POST or RPC) → SeriesBundle
//!     → widget.rs (totals, chart, error state) → render targets
//! ```

pub mod chart;
pub mod dashboard;
pub mod period;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod widget;

pub use chart::ChartSpec;
pub use dashboard::Dashboard;
pub use period::{PeriodState, PeriodSubscriber};
pub use pipeline::{PipelineError, RefreshOutcome, TrafficPipeline};
pub use source::{ConfiguredSource, HttpSeriesSource, RpcSeriesSource, SeriesSource, TrafficQuery};
pub use types::{MetricDomain, Period, SeriesBundle, SeriesPoint};
pub use widget::{ChartWidget, WidgetState};
