//! Login, registration and session introspection against `/api/auth`.

use millwright_api::ApiError;
use millwright_core::NewUser;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::{HttpApi, Method};
use crate::session::Session;

pub const LOGIN_FAILED: &str = "Invalid credentials";
pub const REGISTER_FAILED: &str = "Failed to create account";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Auth endpoints, sharing the session of the [`HttpApi`] it wraps.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: HttpApi,
}

impl AuthClient {
    pub fn new(api: HttpApi) -> Self {
        AuthClient { api }
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Sign in. On success the session holds the returned token and any
    /// cookies the server set; the token is also returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = self
            .api
            .request(
                Method::Post,
                "auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await?;
        let LoginResponse { token } = serde_json::from_value(body)
            .map_err(|e| ApiError::decode(format!("login response: {e}")))?;
        self.session().set_token(token.clone());
        tracing::info!("signed in");
        Ok(token)
    }

    /// Create an account. Returns the server's response body.
    pub async fn register(&self, user: &NewUser) -> Result<Value, ApiError> {
        let body = serde_json::to_value(user).map_err(|e| ApiError::decode(e.to_string()))?;
        self.api
            .request(Method::Post, "auth/register", Some(body))
            .await
    }

    /// The signed-in account, or an error (401 when not signed in).
    pub async fn me(&self) -> Result<Value, ApiError> {
        self.api.request(Method::Get, "auth/me", None).await
    }

    /// Sign out on the server, then forget local credentials whatever the
    /// server said.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.request(Method::Post, "auth/logout", None).await;
        self.session().clear();
        tracing::info!("signed out");
        result.map(|_| ())
    }
}
