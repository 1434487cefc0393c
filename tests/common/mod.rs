//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

/// One request seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

type Responder = Box<dyn Fn(&Hit) -> (u16, String) + Send + Sync>;

struct MockState {
    hits: Mutex<Vec<Hit>>,
    respond: Responder,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let hit = Hit {
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect(),
        body,
    };
    let (status, body) = (state.respond)(&hit);
    state.hits.lock().unwrap().push(hit);
    (StatusCode::from_u16(status).unwrap(), body)
}

/// Start a programmable backend on an ephemeral port.
pub async fn start_mock_backend<F>(respond: F) -> MockBackend
where
    F: Fn(&Hit) -> (u16, String) + Send + Sync + 'static,
{
    let state = Arc::new(MockState {
        hits: Mutex::new(Vec::new()),
        respond: Box::new(respond),
    });
    let app = Router::new().fallback(handle).with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, state }
}

/// Bundle used by the end-to-end request scenarios.
#[allow(dead_code)]
pub const REQUESTS_BUNDLE: &str = r#"{
    "typ-success": {"total": 42, "values": [[1000, 1], [2000, 3]]},
    "typ-error": {"total": 0, "values": []}
}"#;

#[allow(dead_code)]
pub const FLOWS_BUNDLE: &str = r#"{
    "typ-main_out_bytes": {"total": 1500000, "values": [[1000, 500000], [2000, 1000000]]},
    "typ-main_in_bytes": {"total": 2500, "values": [[1000, 2500]]}
}"#;
