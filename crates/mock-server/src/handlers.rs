//! Route handlers: resource collections and `/api/auth`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use millwright_api::{ApiError, ResourceApi};
use millwright_core::ResourceKind;
use serde::Deserialize;
use serde_json::{json, Value};

use super::json_error;
use super::middleware::session_token;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

// ── Resource collections ──────────────────────────────────────────────────────

fn resolve_kind(resource: &str) -> Result<ResourceKind, Response> {
    ResourceKind::from_path(resource).ok_or_else(|| {
        json_error(
            StatusCode::NOT_FOUND,
            &format!("unknown resource '{resource}'"),
        )
        .into_response()
    })
}

fn api_error_response(err: ApiError) -> Response {
    match err {
        ApiError::Status { status, message } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            json_error(status, &message).into_response()
        }
        other => json_error(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()).into_response(),
    }
}

/// GET /api/{resource}
pub(crate) async fn handle_list(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
) -> Response {
    let kind = match resolve_kind(&resource) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match state.api.list(kind).await {
        Ok(records) => (StatusCode::OK, Json(Value::Array(records))).into_response(),
        Err(e) => api_error_response(e),
    }
}

/// POST /api/{resource}
pub(crate) async fn handle_create(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let kind = match resolve_kind(&resource) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match state.api.create(kind, body).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => api_error_response(e),
    }
}

/// PUT /api/{resource}/{id}
pub(crate) async fn handle_update(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let kind = match resolve_kind(&resource) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match state.api.update(kind, &id, body).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => api_error_response(e),
    }
}

/// DELETE /api/{resource}/{id}
pub(crate) async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    let kind = match resolve_kind(&resource) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match state.api.delete(kind, &id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": format!("{} deleted", kind.title()) })),
        )
            .into_response(),
        Err(e) => api_error_response(e),
    }
}

// ── Auth ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// POST /api/auth/login
///
/// Without configured credentials any non-empty email signs in.
pub(crate) async fn handle_login(
    State(state): State<Arc<AppState>>,
    Json(login): Json<LoginRequest>,
) -> Response {
    let accepted = match &state.credentials {
        Some(expected) => expected.email == login.email && expected.password == login.password,
        None => !login.email.is_empty(),
    };
    if !accepted {
        return json_error(StatusCode::UNAUTHORIZED, "Invalid email or password").into_response();
    }
    let token = state.issue_token(&login.email).await;
    tracing::info!(email = %login.email, "login");
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            format!("token={token}; Path=/; HttpOnly; SameSite=Lax"),
        )],
        Json(json!({ "token": token })),
    )
        .into_response()
}

/// POST /api/auth/register
///
/// Stores the account as a user record; the password is not kept.
pub(crate) async fn handle_register(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<Value>,
) -> Response {
    let missing: Vec<&str> = ["username", "email", "password"]
        .into_iter()
        .filter(|field| {
            body.get(*field)
                .and_then(Value::as_str)
                .map_or(true, str::is_empty)
        })
        .collect();
    if !missing.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            &format!("{} required", missing.join(", ")),
        )
        .into_response();
    }
    if let Value::Object(fields) = &mut body {
        fields.remove("password");
    }
    match state.api.create(ResourceKind::Users, body).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => api_error_response(e),
    }
}

/// GET /api/auth/me
pub(crate) async fn handle_me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let email = match session_token(&headers) {
        Some(token) => state.session_email(&token).await,
        None => None,
    };
    match email {
        Some(email) => (
            StatusCode::OK,
            Json(json!({ "email": email, "authenticated": true })),
        )
            .into_response(),
        None => json_error(StatusCode::UNAUTHORIZED, "Not authenticated").into_response(),
    }
}

/// POST /api/auth/logout
pub(crate) async fn handle_logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = session_token(&headers) {
        state.revoke(&token).await;
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, "token=; Path=/; Max-Age=0".to_string())],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}
