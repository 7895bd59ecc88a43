//! In-memory `ResourceApi` backend.
//!
//! Behaves like the real server for the operations the card uses: sequential
//! string keys on create, `404 {message}` for unknown ids, whole-collection
//! list in insertion order. Tests can script failures per (collection,
//! operation) and count the requests that were made.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use millwright_core::ResourceKind;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::traits::ResourceApi;

/// The four collection operations, for failure injection and request counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiOperation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApiOperation::List => "list",
            ApiOperation::Create => "create",
            ApiOperation::Update => "update",
            ApiOperation::Delete => "delete",
        })
    }
}

/// Cloning shares the underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    collections: HashMap<ResourceKind, Vec<Value>>,
    last_id: u64,
    failures: HashMap<(ResourceKind, ApiOperation), ApiError>,
    requests: HashMap<(ResourceKind, ApiOperation), usize>,
}

impl MemoryInner {
    fn next_id(&mut self) -> String {
        self.last_id += 1;
        self.last_id.to_string()
    }

    // Counts the request, then returns the scripted failure if any.
    fn begin(&mut self, kind: ResourceKind, op: ApiOperation) -> Result<(), ApiError> {
        *self.requests.entry((kind, op)).or_default() += 1;
        match self.failures.get(&(kind, op)) {
            Some(err) => {
                tracing::debug!(%kind, %op, error = %err, "injected failure");
                Err(err.clone())
            }
            None => Ok(()),
        }
    }

    fn position(&self, kind: ResourceKind, id: &str) -> Option<usize> {
        self.collections
            .get(&kind)?
            .iter()
            .position(|r| key_of(r, kind).as_deref() == Some(id))
    }
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Preload `kind` with `records`, appending to what is already there.
    ///
    /// Objects without a key get the next sequential id. Numeric ids push the
    /// sequence past them so later creates never collide.
    pub fn seed(&self, kind: ResourceKind, records: Vec<Value>) {
        let mut inner = self.lock();
        for mut record in records {
            if let Value::Object(fields) = &mut record {
                match key_of_fields(fields, kind) {
                    Some(id) => {
                        if let Ok(n) = id.parse::<u64>() {
                            inner.last_id = inner.last_id.max(n);
                        }
                    }
                    None => {
                        let id = inner.next_id();
                        fields.insert(kind.key_field().to_string(), Value::String(id));
                    }
                }
            }
            inner.collections.entry(kind).or_default().push(record);
        }
    }

    /// Current contents of `kind`, bypassing request counting and failures.
    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        self.lock()
            .collections
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every subsequent `op` on `kind` fail with `err` until cleared.
    pub fn fail(&self, kind: ResourceKind, op: ApiOperation, err: ApiError) {
        self.lock().failures.insert((kind, op), err);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Requests received for `(kind, op)`, including failed ones.
    pub fn request_count(&self, kind: ResourceKind, op: ApiOperation) -> usize {
        self.lock().requests.get(&(kind, op)).copied().unwrap_or(0)
    }

    pub fn total_requests(&self) -> usize {
        self.lock().requests.values().sum()
    }
}

#[async_trait]
impl ResourceApi for MemoryApi {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        let mut inner = self.lock();
        inner.begin(kind, ApiOperation::List)?;
        Ok(inner.collections.get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        let mut inner = self.lock();
        inner.begin(kind, ApiOperation::Create)?;
        let mut fields = into_object(kind, body)?;
        let id = inner.next_id();
        fields.insert(kind.key_field().to_string(), Value::String(id.clone()));
        let record = Value::Object(fields);
        inner.collections.entry(kind).or_default().push(record.clone());
        tracing::debug!(%kind, %id, "created");
        Ok(record)
    }

    async fn update(&self, kind: ResourceKind, id: &str, body: Value) -> Result<Value, ApiError> {
        let mut inner = self.lock();
        inner.begin(kind, ApiOperation::Update)?;
        let fields = into_object(kind, body)?;
        let idx = inner
            .position(kind, id)
            .ok_or_else(|| not_found(kind))?;
        let records = inner.collections.entry(kind).or_default();
        let Value::Object(existing) = &mut records[idx] else {
            return Err(not_found(kind));
        };
        for (key, value) in fields {
            existing.insert(key, value);
        }
        existing.insert(kind.key_field().to_string(), Value::String(id.to_string()));
        tracing::debug!(%kind, %id, "updated");
        Ok(records[idx].clone())
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        let mut inner = self.lock();
        inner.begin(kind, ApiOperation::Delete)?;
        let idx = inner
            .position(kind, id)
            .ok_or_else(|| not_found(kind))?;
        inner.collections.entry(kind).or_default().remove(idx);
        tracing::debug!(%kind, %id, "deleted");
        Ok(())
    }
}

fn into_object(kind: ResourceKind, body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(ApiError::status(
            400,
            format!("{} payload must be a JSON object", kind.title()),
        )),
    }
}

fn not_found(kind: ResourceKind) -> ApiError {
    ApiError::status(404, format!("{} not found", kind.title()))
}

/// The record's primary key as a string. Numeric keys are accepted.
pub fn key_of(record: &Value, kind: ResourceKind) -> Option<String> {
    match record {
        Value::Object(fields) => key_of_fields(fields, kind),
        _ => None,
    }
}

fn key_of_fields(fields: &Map<String, Value>, kind: ResourceKind) -> Option<String> {
    match fields.get(kind.key_field())? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
