//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router on top of an in-process store, plus a real server for tests that
//! need a socket.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{self, header, Method, Request, Response, StatusCode};
use async_trait::async_trait;
use axum::Router;
use http_body_util::BodyExt;
use pinggate_server::api::{create_router, AppState};
use pinggate_server::config::Config;
use pinggate_server::kv::{KvError, KvResult, KvStore, MemoryStore};
use pinggate_server::ratelimit::RateLimitConfig;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    /// Direct handle on the store behind the router, for assertions.
    pub store: MemoryStore,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a test app with default limits.
    pub fn new() -> Self {
        Self::with_limits(RateLimitConfig::default())
    }

    /// Create a test app with custom admission limits.
    pub fn with_limits(rate_limit: RateLimitConfig) -> Self {
        Self::with_config(Config::default_for_test(), rate_limit)
    }

    /// Create a test app with a custom server config.
    pub fn with_config(config: Config, rate_limit: RateLimitConfig) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config.clone(), rate_limit);

        Self {
            router: create_router(state),
            store,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST /login and return the issued session id.
    pub async fn login(&self, username: &str) -> String {
        let resp = self
            .oneshot(json_request(
                Method::POST,
                "/login",
                &serde_json::json!({ "username": username }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK, "login should succeed");

        let body = body_json(resp).await;
        body["sessionId"]
            .as_str()
            .expect("sessionId in login response")
            .to_string()
    }

    /// Request for GET /ping with the given session id.
    pub fn ping_request(session_id: &str) -> Request<Body> {
        json_request(
            Method::GET,
            "/ping",
            &serde_json::json!({ "sessionId": session_id }),
        )
    }

    /// GET /ping and return the status.
    pub async fn ping(&self, session_id: &str) -> StatusCode {
        self.oneshot(Self::ping_request(session_id)).await.status()
    }
}

/// Build a request carrying a JSON body.
pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    TestApp::request(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Build a request carrying a raw JSON-typed body.
pub fn raw_json_request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
    TestApp::request(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("valid request")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

// ============================================================================
// Failing Store
// ============================================================================

/// A store command that [`FaultyStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvOp {
    Get,
    Set,
    Incr,
    Decr,
    Expire,
}

/// Wraps a [`MemoryStore`] and fails the selected commands with a timeout.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    failing: Vec<KvOp>,
}

impl FaultyStore {
    /// Fails only the given commands; everything else reaches `inner`.
    pub fn failing(ops: &[KvOp]) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: ops.to_vec(),
        }
    }

    /// Fails every command.
    pub fn unavailable() -> Self {
        Self::failing(&[KvOp::Get, KvOp::Set, KvOp::Incr, KvOp::Decr, KvOp::Expire])
    }

    fn check(&self, op: KvOp) -> KvResult<()> {
        if self.failing.contains(&op) {
            Err(KvError::Timeout(Duration::from_millis(1)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KvStore for FaultyStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.check(KvOp::Get)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> KvResult<()> {
        self.check(KvOp::Set)?;
        self.inner.set(key, value, ttl).await
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        self.check(KvOp::Incr)?;
        self.inner.incr(key).await
    }

    async fn decr(&self, key: &str) -> KvResult<i64> {
        self.check(KvOp::Decr)?;
        self.inner.decr(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool> {
        self.check(KvOp::Expire)?;
        self.inner.expire(key, ttl).await
    }
}

/// Full router on top of a [`FaultyStore`] with default config and limits.
pub fn faulty_router(store: &FaultyStore) -> Router {
    let state = AppState::new(
        Arc::new(store.clone()),
        Config::default_for_test(),
        RateLimitConfig::default(),
    );
    create_router(state)
}

// ============================================================================
// Test Server
// ============================================================================

/// A running test server bound to a random port.
pub struct TestServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL for HTTP requests (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn a real HTTP server on a random port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}
