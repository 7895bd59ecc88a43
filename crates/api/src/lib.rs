//! millwright-api: the seam between a resource card and the server.
//!
//! [`ResourceApi`] is the four-call collection interface. [`MemoryApi`] is
//! the in-process backend used by tests and the mock server; the HTTP
//! client lives in `millwright-http`. Any backend can be checked with
//! [`conformance::run_conformance_suite`].

pub mod conformance;
mod error;
mod memory;
mod traits;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::ApiError;
pub use memory::{key_of, ApiOperation, MemoryApi};
pub use traits::ResourceApi;

/// Decode one response body into a typed record.
pub fn decode_record<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(e.to_string()))
}

/// Decode a list response; any record that does not fit fails the whole list.
pub fn decode_records<R: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<R>, ApiError> {
    values.into_iter().map(decode_record).collect()
}

/// Encode a draft or record as a request body.
pub fn encode_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::decode(e.to_string()))
}
