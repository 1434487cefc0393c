//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! rpc client, traffic pipeline
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (call and refresh counters)
//! ```
//!
//! # Design Decisions
//! - Structured fields (method, widget, domain) on every event
//! - Metrics go to whatever recorder the host installs; none is installed by default

pub mod logging;
pub mod metrics;
