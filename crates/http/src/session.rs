//! Session credentials shared by every request a client makes.
//!
//! A [`Session`] is a cheap handle: clones see the same credentials, so the
//! auth client and every card's API client observe login, logout and expiry
//! together.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Credentials {
    token: Option<String>,
    cookie: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Credentials>>,
}

impl Session {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding a bearer token (from config or a previous
    /// login).
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    fn read(&self) -> RwLockReadGuard<'_, Credentials> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Credentials> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.write().token = Some(token.into());
    }

    /// Record cookies from `Set-Cookie` header values. Only the `name=value`
    /// part of each is kept; attributes are dropped. A cookie with the same
    /// name replaces the earlier one.
    pub fn store_cookies<'a>(&self, set_cookie: impl IntoIterator<Item = &'a str>) {
        let mut creds = self.write();
        let mut jar: Vec<(String, String)> = creds
            .cookie
            .as_deref()
            .map(parse_cookie_header)
            .unwrap_or_default();
        for raw in set_cookie {
            let pair = raw.split(';').next().unwrap_or("").trim();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim().to_string();
            jar.retain(|(n, _)| *n != name);
            jar.push((name, value.trim().to_string()));
        }
        if !jar.is_empty() {
            creds.cookie = Some(
                jar.iter()
                    .map(|(n, v)| format!("{n}={v}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            );
        }
    }

    /// True while a token or cookie is held.
    pub fn is_active(&self) -> bool {
        let creds = self.read();
        creds.token.is_some() || creds.cookie.is_some()
    }

    /// Forget all credentials (logout or expiry).
    pub fn clear(&self) {
        *self.write() = Credentials::default();
    }

    /// Value for the `Cookie` request header: captured cookies, else the
    /// token as `token=<t>`.
    pub fn cookie_header(&self) -> Option<String> {
        let creds = self.read();
        creds
            .cookie
            .clone()
            .or_else(|| creds.token.as_ref().map(|t| format!("token={t}")))
    }

    /// Value for the `Authorization` request header.
    pub fn authorization_header(&self) -> Option<String> {
        self.read().token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
