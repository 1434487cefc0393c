//! Invocation client.
//!
//! # Responsibilities
//! - Resolve a method (typed or by name) against the registry
//! - Attach diagnostic and authorization metadata
//! - Execute the call exactly once and fold the outcome into [`RpcCallResult`]

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::observability::metrics;
use crate::rpc::method::{MethodRegistry, RpcMethod};
use crate::rpc::transport::{CallMetadata, RpcTransport};
use crate::rpc::types::{RpcCallResult, RpcRequest, NO_SUCH_FUNCTION};
use crate::session::SessionAccessor;

pub const METHOD_HEADER: &str = "x-grpc-method";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Uniform, authenticated remote call surface.
pub struct RpcClient<T> {
    transport: T,
    registry: MethodRegistry,
    session: Arc<dyn SessionAccessor>,
}

impl<T: RpcTransport> RpcClient<T> {
    pub fn new(transport: T, registry: MethodRegistry, session: Arc<dyn SessionAccessor>) -> Self {
        Self {
            transport,
            registry,
            session,
        }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Typed call; the method is fixed by the request type.
    pub async fn call<R: RpcRequest>(&self, request: &R) -> RpcCallResult<R::Response> {
        let value = match self.dispatch_serialized(R::METHOD, request).await {
            RpcCallResult::Ok(value) => value,
            RpcCallResult::Err(e) => return RpcCallResult::Err(e),
        };

        match serde_json::from_value(value) {
            Ok(response) => RpcCallResult::Ok(response),
            Err(e) => {
                tracing::warn!(method = %R::METHOD, error = %e, "RPC response did not match expected shape");
                RpcCallResult::Err(e.to_string())
            }
        }
    }

    /// Dynamic call by untyped method name.
    ///
    /// Unknown names resolve to `no such function` without touching the transport.
    pub async fn invoke<Q: Serialize + ?Sized>(&self, method_name: &str, request: &Q) -> RpcCallResult {
        let Some(method) = self.registry.resolve(method_name) else {
            tracing::warn!(method = %method_name, "RPC method not found");
            return RpcCallResult::Err(NO_SUCH_FUNCTION.to_string());
        };
        self.dispatch_serialized(method, request).await
    }

    async fn dispatch_serialized<Q: Serialize + ?Sized>(
        &self,
        method: RpcMethod,
        request: &Q,
    ) -> RpcCallResult {
        match serde_json::to_value(request) {
            Ok(body) => self.dispatch(method, body).await,
            Err(e) => RpcCallResult::Err(e.to_string()),
        }
    }

    async fn dispatch(&self, method: RpcMethod, body: Value) -> RpcCallResult {
        let Some(path) = self.registry.path(method) else {
            tracing::warn!(method = %method, "RPC method not registered");
            return RpcCallResult::Err(NO_SUCH_FUNCTION.to_string());
        };

        let metadata = self.metadata(method);
        tracing::debug!(
            method = %method,
            request_id = %metadata[REQUEST_ID_HEADER],
            request = %body,
            "RPC request"
        );

        match self.transport.unary_call(&path, &metadata, body).await {
            Ok(response) => {
                tracing::debug!(method = %method, response = %response, "RPC response");
                metrics::record_rpc_call(method.as_str(), true);
                RpcCallResult::Ok(response)
            }
            Err(e) => {
                tracing::warn!(method = %method, error = %e, "RPC call failed");
                metrics::record_rpc_call(method.as_str(), false);
                RpcCallResult::Err(e.to_string())
            }
        }
    }

    /// Metadata for one call, built from the session at call time.
    pub fn metadata(&self, method: RpcMethod) -> CallMetadata {
        let mut metadata = CallMetadata::new();
        metadata.insert(METHOD_HEADER.to_string(), method.as_str().to_string());
        metadata.insert(
            REQUEST_ID_HEADER.to_string(),
            uuid::Uuid::new_v4().to_string(),
        );

        if let Some(user) = self.session.local_user() {
            if let Some(token) = user.bearer_token() {
                metadata.insert(AUTHORIZATION_HEADER.to_string(), format!("Bearer {}", token));
            }
        }
        metadata
    }
}
