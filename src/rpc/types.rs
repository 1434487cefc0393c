//! Call results and typed request payloads.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::rpc::method::RpcMethod;

/// Error text for a method name the call surface does not expose.
pub const NO_SUCH_FUNCTION: &str = "no such function";

/// Outcome of one remote call. Exactly one variant is populated.
///
/// Serializes as `{"ok": true, "value": ...}` or `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCallResult<T = Value> {
    Ok(T),
    Err(String),
}

impl<T> RpcCallResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, RpcCallResult::Ok(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RpcCallResult::Ok(_) => None,
            RpcCallResult::Err(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            RpcCallResult::Ok(v) => Ok(v),
            RpcCallResult::Err(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RpcCallResult<U> {
        match self {
            RpcCallResult::Ok(v) => RpcCallResult::Ok(f(v)),
            RpcCallResult::Err(e) => RpcCallResult::Err(e),
        }
    }
}

impl<T: Serialize> Serialize for RpcCallResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            RpcCallResult::Ok(value) => {
                map.serialize_entry("ok", &true)?;
                map.serialize_entry("value", value)?;
            }
            RpcCallResult::Err(error) => {
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

/// A request bound at compile time to the method that accepts it.
pub trait RpcRequest: Serialize + Send + Sync {
    const METHOD: RpcMethod;
    type Response: DeserializeOwned + Send;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEmailRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEmailResponse {
    pub email: String,
    pub access_token: String,
    #[serde(default)]
    pub nick_name: Option<String>,
}

impl RpcRequest for LoginEmailRequest {
    const METHOD: RpcMethod = RpcMethod::LoginEmail;
    type Response = LoginEmailResponse;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: u64,
    pub name: String,
}

impl RpcRequest for CreateProjectRequest {
    const METHOD: RpcMethod = RpcMethod::CreateProject;
    type Response = ProjectSummary;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessTokenRequest {
    /// What the token is used for.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub name: String,
    pub value: String,
}

impl RpcRequest for CreateAccessTokenRequest {
    const METHOD: RpcMethod = RpcMethod::CreateAccessToken;
    type Response = AccessToken;
}
