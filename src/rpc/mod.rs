//! Remote call invocation subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → client.rs (typed `call` or dynamic `invoke` by name)
//!     → method.rs (registry: closed set of methods → call paths)
//!     → session (bearer credential, read per call)
//!     → transport.rs (single unary call, no retry)
//!     → RpcCallResult (never an Err across this boundary)
//! ```
//!
//! # Design Decisions
//! - Method names resolve against a closed enum; unknown names fail locally
//! - Every outcome is folded into a tagged result so callers branch on data
//! - Concurrent calls are independent; nothing is deduplicated

pub mod client;
pub mod method;
pub mod transport;
pub mod types;

pub use client::RpcClient;
pub use method::{MethodRegistry, RpcMethod};
pub use transport::{CallMetadata, HttpTransport, RpcTransport, TransportError};
pub use types::{RpcCallResult, RpcRequest, NO_SUCH_FUNCTION};
