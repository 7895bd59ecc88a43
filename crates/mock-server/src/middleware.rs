//! HTTP middleware: session authentication and request logging.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::state::AppState;

/// Session authentication middleware.
///
/// When credentials are configured, every `/api/` route except `/api/auth/*`
/// needs a token issued by `POST /api/auth/login`, sent either as
/// `Authorization: Bearer <token>` or as a `token=<token>` cookie.
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if state.credentials.is_none() {
        return next.run(request).await;
    }
    let path = request.uri().path();
    if !path.starts_with("/api/") || path.starts_with("/api/auth/") {
        return next.run(request).await;
    }

    match session_token(request.headers()) {
        Some(token) if state.session_email(&token).await.is_some() => next.run(request).await,
        _ => super::json_error(StatusCode::UNAUTHORIZED, "authentication required").into_response(),
    }
}

/// Log method, path and status of every request.
pub(crate) async fn trace_middleware(request: Request<axum::body::Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!(%method, %path, status = response.status().as_u16(), "handled");
    response
}

/// The session token from the bearer header, else from the `token` cookie.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    bearer.or_else(|| {
        headers
            .get_all("cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == "token")
            .map(|(_, value)| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer b1"));
        headers.insert("cookie", HeaderValue::from_static("token=c1"));
        assert_eq!(session_token(&headers).as_deref(), Some("b1"));
    }

    #[test]
    fn token_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("theme=dark; token=c1"));
        assert_eq!(session_token(&headers).as_deref(), Some("c1"));
        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
