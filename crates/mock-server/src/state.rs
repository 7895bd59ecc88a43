//! Shared server state: the backing collections and live sessions.

use std::collections::HashMap;

use millwright_api::MemoryApi;
use tokio::sync::Mutex;

/// Login accepted when auth enforcement is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Application state shared across request handlers.
pub(crate) struct AppState {
    pub(crate) api: MemoryApi,
    /// `None` disables auth enforcement on resource routes.
    pub(crate) credentials: Option<Credentials>,
    /// Issued token -> email it was issued to.
    pub(crate) sessions: Mutex<HashMap<String, String>>,
    pub(crate) issued: Mutex<u64>,
}

impl AppState {
    pub(crate) fn new(api: MemoryApi, credentials: Option<Credentials>) -> Self {
        AppState {
            api,
            credentials,
            sessions: Mutex::new(HashMap::new()),
            issued: Mutex::new(0),
        }
    }

    pub(crate) async fn issue_token(&self, email: &str) -> String {
        let mut issued = self.issued.lock().await;
        *issued += 1;
        let token = format!("mock-session-{}", *issued);
        self.sessions
            .lock()
            .await
            .insert(token.clone(), email.to_string());
        token
    }

    pub(crate) async fn session_email(&self, token: &str) -> Option<String> {
        self.sessions.lock().await.get(token).cloned()
    }

    pub(crate) async fn revoke(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }
}
