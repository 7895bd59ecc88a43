//! millwright-mock-server: an in-memory stand-in for the maintenance API.
//!
//! Serves a [`MemoryApi`] over the same surface the real server exposes,
//! so the HTTP client and the CLI can be exercised end to end.
//!
//! Endpoints:
//! - GET    /health
//! - GET    /api/{resource}          - list a collection
//! - POST   /api/{resource}          - create, server assigns the key
//! - PUT    /api/{resource}/{id}     - update
//! - DELETE /api/{resource}/{id}     - delete
//! - POST   /api/auth/login          - `{email,password}` -> `{token}` + cookie
//! - POST   /api/auth/register       - create a user account
//! - GET    /api/auth/me             - the signed-in account
//! - POST   /api/auth/logout         - revoke the session
//!
//! Errors are `{"message": ...}` with a non-2xx status. When credentials are
//! configured, resource routes answer 401 without a valid session token.

mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{middleware as axum_middleware, Json, Router};
use millwright_api::MemoryApi;
use millwright_core::ResourceKind;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_create, handle_delete, handle_health, handle_list, handle_login, handle_logout,
    handle_me, handle_not_found, handle_register, handle_update,
};
use self::middleware::{auth_middleware, trace_middleware};
use self::state::AppState;

pub use self::state::Credentials;

/// Default listening port, matching the client's default base URL.
pub const DEFAULT_PORT: u16 = 5000;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({ "message": message })))
}

/// Build the application router over `api`.
pub fn router(api: MemoryApi, credentials: Option<Credentials>) -> Router {
    let state = Arc::new(AppState::new(api, credentials));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/me", get(handle_me))
        .route("/api/auth/logout", post(handle_logout))
        .route("/api/{resource}", get(handle_list).post(handle_create))
        .route(
            "/api/{resource}/{id}",
            put(handle_update).delete(handle_delete),
        )
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn(trace_middleware))
        .layer(cors)
        .with_state(state)
}

/// A server running on a background task. Aborted on drop.
pub struct SpawnedServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SpawnedServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>`, suitable as a client base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for SpawnedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve `api` on an ephemeral localhost port from the current runtime.
pub async fn spawn(
    api: MemoryApi,
    credentials: Option<Credentials>,
) -> std::io::Result<SpawnedServer> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = router(api, credentials);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "mock server stopped");
        }
    });
    Ok(SpawnedServer { addr, handle })
}

/// Serve `api` on `0.0.0.0:<port>` until Ctrl+C.
pub async fn start_server(
    port: u16,
    api: MemoryApi,
    credentials: Option<Credentials>,
) -> Result<(), Box<dyn std::error::Error>> {
    if credentials.is_some() {
        tracing::info!("session authentication enabled");
    }
    let app = router(api, credentials);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("mock API listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}

/// Load fixture data: a JSON object mapping resource paths to arrays of
/// records, e.g. `{"plants": [{"name": "North"}], "machines": [...]}`.
///
/// Returns the number of records loaded.
pub fn seed_from_json(api: &MemoryApi, fixture: &Value) -> Result<usize, String> {
    let Value::Object(collections) = fixture else {
        return Err("seed file must contain a JSON object keyed by resource".to_string());
    };
    let mut loaded = 0;
    for (resource, records) in collections {
        let kind = resource
            .parse::<ResourceKind>()
            .map_err(|e| e.to_string())?;
        let Value::Array(records) = records else {
            return Err(format!("'{resource}' must be an array of records"));
        };
        loaded += records.len();
        api.seed(kind, records.clone());
    }
    Ok(loaded)
}
