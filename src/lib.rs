//! Traffic dashboard client library.

pub mod config;
pub mod format;
pub mod observability;
pub mod render;
pub mod rpc;
pub mod session;
pub mod traffic;

pub use config::schema::DashboardConfig;
pub use rpc::{RpcCallResult, RpcClient, RpcMethod};
pub use traffic::{Dashboard, Period, PeriodState};
