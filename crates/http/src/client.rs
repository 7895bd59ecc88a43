//! `ResourceApi` over HTTP.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` so a request
//! only suspends the operation that issued it. Status codes are not turned
//! into transport errors by ureq: non-2xx bodies are read so the server's
//! `{message}` can be surfaced.

use std::fmt;

use async_trait::async_trait;
use millwright_api::{ApiError, ResourceApi};
use millwright_core::ResourceKind;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// What the blocking half hands back to the async half.
struct RawResponse {
    status: u16,
    set_cookies: Vec<String>,
    body: String,
}

/// HTTP client for the maintenance API.
///
/// Cloning is cheap and clones share the connection pool and the
/// [`Session`].
#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    agent: ureq::Agent,
    session: Session,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.session.is_active())
            .finish()
    }
}

impl HttpApi {
    /// A client whose session starts with `config.token`, if any.
    pub fn new(config: &ClientConfig) -> Self {
        let session = match &config.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        };
        Self::with_session(config, session)
    }

    /// A client sharing an existing session.
    pub fn with_session(config: &ClientConfig, session: Session) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .into();
        HttpApi {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Send one request to `/api/<path>` and return the decoded 2xx body
    /// (`Null` when empty).
    ///
    /// Cookies set by the response are kept in the session. A 401 clears it.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut headers: Vec<(&'static str, String)> = Vec::new();
        if let Some(cookie) = self.session.cookie_header() {
            headers.push(("Cookie", cookie));
        }
        if let Some(auth) = self.session.authorization_header() {
            headers.push(("Authorization", auth));
        }

        let agent = self.agent.clone();
        let blocking_url = url.clone();
        let raw = tokio::task::spawn_blocking(move || {
            execute(&agent, method, &blocking_url, &headers, body.as_ref())
        })
        .await
        .map_err(|e| ApiError::transport(format!("task join error: {e}")))??;

        tracing::debug!(method = method.as_str(), %url, status = raw.status, "api request");

        self.session
            .store_cookies(raw.set_cookies.iter().map(String::as_str));

        if (200..300).contains(&raw.status) {
            if raw.body.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&raw.body)
                .map_err(|e| ApiError::decode(format!("invalid JSON from {url}: {e}")));
        }

        if raw.status == 401 && self.session.is_active() {
            tracing::warn!(%url, "session rejected by server; clearing credentials");
            self.session.clear();
        }
        Err(ApiError::Status {
            status: raw.status,
            message: error_message(&raw.body),
        })
    }
}

fn execute(
    agent: &ureq::Agent,
    method: Method,
    url: &str,
    headers: &[(&'static str, String)],
    body: Option<&Value>,
) -> Result<RawResponse, ApiError> {
    let result = match (method, body) {
        (Method::Get, _) => with_headers(agent.get(url), headers).call(),
        (Method::Delete, _) => with_headers(agent.delete(url), headers).call(),
        (Method::Post, Some(body)) => with_headers(agent.post(url), headers).send_json(body),
        (Method::Post, None) => with_headers(agent.post(url), headers).send_empty(),
        (Method::Put, Some(body)) => with_headers(agent.put(url), headers).send_json(body),
        (Method::Put, None) => with_headers(agent.put(url), headers).send_empty(),
    };
    let response = result.map_err(|e| ApiError::transport(e.to_string()))?;

    let status = response.status().as_u16();
    let set_cookies = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();
    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| ApiError::transport(format!("failed to read response body: {e}")))?;

    Ok(RawResponse {
        status,
        set_cookies,
        body,
    })
}

fn with_headers<B>(
    mut request: ureq::RequestBuilder<B>,
    headers: &[(&'static str, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }
    request
}

/// The `message` field of a JSON error body, if any.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ResourceApi for HttpApi {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        match self.request(Method::Get, kind.path(), None).await? {
            Value::Array(records) => Ok(records),
            other => Err(ApiError::decode(format!(
                "expected a JSON array from /api/{kind}, got {}",
                kind_of(&other)
            ))),
        }
    }

    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        self.request(Method::Post, kind.path(), Some(body)).await
    }

    async fn update(&self, kind: ResourceKind, id: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::Put, &record_path(kind, id), Some(body))
            .await
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        self.request(Method::Delete, &record_path(kind, id), None)
            .await
            .map(|_| ())
    }
}

/// `<resource>/<id>` with the id escaped as one path segment, so `?`, `#`
/// or `/` in an id never address another record.
fn record_path(kind: ResourceKind, id: &str) -> String {
    format!("{}/{}", kind.path(), urlencoding::encode(id))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty body",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
