//! Typed method registry.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every method exposed by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RpcMethod {
    LoginEmail,
    CreateProject,
    CreateAccessToken,
    TrafficRequests,
    TrafficFlows,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 5] = [
        RpcMethod::LoginEmail,
        RpcMethod::CreateProject,
        RpcMethod::CreateAccessToken,
        RpcMethod::TrafficRequests,
        RpcMethod::TrafficFlows,
    ];

    /// Wire name, as used in call paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::LoginEmail => "LoginEmail",
            RpcMethod::CreateProject => "CreateProject",
            RpcMethod::CreateAccessToken => "CreateAccessToken",
            RpcMethod::TrafficRequests => "TrafficRequests",
            RpcMethod::TrafficFlows => "TrafficFlows",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name matches no known method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for RpcMethod {
    type Err = UnknownMethod;

    /// Accepts the wire name (`LoginEmail`) and the client stub name (`loginEmail`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RpcMethod::ALL
            .into_iter()
            .find(|m| {
                let (name, wire) = (s.as_bytes(), m.as_str().as_bytes());
                name == wire
                    || (name.len() == wire.len()
                        && name[0] == wire[0].to_ascii_lowercase()
                        && name[1..] == wire[1..])
            })
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// The methods available on one remote service.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    service: String,
    methods: BTreeSet<RpcMethod>,
}

impl MethodRegistry {
    /// Registry exposing every known method.
    pub fn new(service: impl Into<String>) -> Self {
        Self::with_methods(service, RpcMethod::ALL)
    }

    pub fn with_methods(
        service: impl Into<String>,
        methods: impl IntoIterator<Item = RpcMethod>,
    ) -> Self {
        Self {
            service: service.into(),
            methods: methods.into_iter().collect(),
        }
    }

    pub fn contains(&self, method: RpcMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Resolve an untyped method name to a registered method.
    pub fn resolve(&self, name: &str) -> Option<RpcMethod> {
        name.parse().ok().filter(|m| self.contains(*m))
    }

    /// Call path for a registered method, e.g. `/moni.MoniRpcService/LoginEmail`.
    pub fn path(&self, method: RpcMethod) -> Option<String> {
        self.contains(method)
            .then(|| format!("/{}/{}", self.service, method.as_str()))
    }
}
