//! millwright-http: the maintenance API over HTTP.
//!
//! - [`HttpApi`] -- `ResourceApi` implementation (ureq, blocking pool)
//! - [`Session`] -- shared credentials, cleared on logout or a 401
//! - [`AuthClient`] -- `/api/auth` login, register, me, logout
//! - [`ClientConfig`] -- base URL, token and timeout from flags, env or file

mod auth;
mod client;
pub mod config;
mod session;

pub use auth::{AuthClient, LOGIN_FAILED, REGISTER_FAILED};
pub use client::HttpApi;
pub use config::{ClientConfig, ConfigError, ConfigFile, ConfigOverrides};
pub use session::Session;
