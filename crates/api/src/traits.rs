use async_trait::async_trait;
use millwright_core::ResourceKind;
use serde_json::Value;

use crate::error::ApiError;

/// The remote collection API a resource card talks to.
///
/// Bodies are raw JSON objects; typed decoding against the resource schema
/// happens in the caller (see [`crate::decode_record`]). Every call is a
/// single request with no retry.
///
/// ## Error semantics
///
/// - Non-2xx responses return `ApiError::Status`, carrying the server's
///   `message` when the body had one.
/// - A request that never completed returns `ApiError::Transport`.
/// - A 2xx body that is not the expected JSON shape returns
///   `ApiError::Decode`.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so one client can be
/// shared by several cards and across spawned tasks.
#[async_trait]
pub trait ResourceApi: Send + Sync + 'static {
    /// `GET /api/<kind>`: the whole collection in server order.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError>;

    /// `POST /api/<kind>`: returns the created representation, including its
    /// server-assigned key.
    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError>;

    /// `PUT /api/<kind>/{id}`: returns the updated representation.
    async fn update(&self, kind: ResourceKind, id: &str, body: Value) -> Result<Value, ApiError>;

    /// `DELETE /api/<kind>/{id}`.
    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError>;
}
