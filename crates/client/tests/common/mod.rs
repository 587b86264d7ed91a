//! In-process stub of the table-settings REST endpoints.
//!
//! Binds an axum router to `127.0.0.1:0`, records every request it
//! receives and answers with canned bodies the test controls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use gridview_client::ClientConfig;

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub endpoint: String,
    pub id: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

pub struct StubState {
    pub requests: Vec<Recorded>,
    /// Body returned from list calls.
    pub list_body: Value,
    /// Body returned from create calls.
    pub create_body: Value,
    /// When set, every call answers with this status.
    pub fail_status: Option<u16>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            list_body: json!([]),
            create_body: json!({ "insertId": 1 }),
            fail_status: None,
        }
    }
}

pub type SharedStub = Arc<Mutex<StubState>>;

/// Start the stub and return its shared state plus a config pointing at it.
pub async fn start_stub() -> (SharedStub, ClientConfig) {
    let stub: SharedStub = Arc::new(Mutex::new(StubState::default()));

    let app = Router::new()
        .route("/api/{endpoint}", get(list_rows).post(create_row))
        .route("/api/{endpoint}/{id}", put(update_row).delete(delete_row))
        .with_state(Arc::clone(&stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig {
        api_url: format!("http://{addr}/api"),
        request_timeout_secs: 5,
        user_id: Some(7),
        ..ClientConfig::default()
    };
    (stub, config)
}

fn failure(stub: &StubState) -> Option<Response> {
    stub.fail_status.map(|code| {
        let status = StatusCode::from_u16(code).unwrap();
        (status, "settings service exploded").into_response()
    })
}

async fn list_rows(
    State(stub): State<SharedStub>,
    Path(endpoint): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut stub = stub.lock().unwrap();
    stub.requests.push(Recorded {
        method: "GET",
        endpoint,
        id: None,
        query,
        body: None,
    });
    if let Some(resp) = failure(&stub) {
        return resp;
    }
    Json(stub.list_body.clone()).into_response()
}

async fn create_row(
    State(stub): State<SharedStub>,
    Path(endpoint): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut stub = stub.lock().unwrap();
    stub.requests.push(Recorded {
        method: "POST",
        endpoint,
        id: None,
        query: HashMap::new(),
        body: Some(body),
    });
    if let Some(resp) = failure(&stub) {
        return resp;
    }
    Json(stub.create_body.clone()).into_response()
}

async fn update_row(
    State(stub): State<SharedStub>,
    Path((endpoint, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut stub = stub.lock().unwrap();
    stub.requests.push(Recorded {
        method: "PUT",
        endpoint,
        id: Some(id),
        query: HashMap::new(),
        body: Some(body),
    });
    if let Some(resp) = failure(&stub) {
        return resp;
    }
    Json(json!({ "affected": 1 })).into_response()
}

async fn delete_row(
    State(stub): State<SharedStub>,
    Path((endpoint, id)): Path<(String, String)>,
) -> Response {
    let mut stub = stub.lock().unwrap();
    stub.requests.push(Recorded {
        method: "DELETE",
        endpoint,
        id: Some(id),
        query: HashMap::new(),
        body: None,
    });
    if let Some(resp) = failure(&stub) {
        return resp;
    }
    StatusCode::NO_CONTENT.into_response()
}
