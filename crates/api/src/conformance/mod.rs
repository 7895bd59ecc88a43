//! Conformance test suite for `ResourceApi` implementations.
//!
//! A backend-agnostic suite any `ResourceApi` can run to check it behaves
//! the way the resource card expects. It covers:
//!
//! - **CRUD**: server-assigned keys, list order, in-place update, delete
//! - **Errors**: 404 with a `message` for unknown ids, no side effects on
//!   failure
//! - **Isolation**: collections do not leak into each other
//! - **Concurrency**: parallel creates get distinct keys
//!
//! # Usage
//!
//! Call [`run_conformance_suite`] with a factory that returns a fresh, empty
//! backend for each test:
//!
//! ```ignore
//! use millwright_api::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn http_conformance() {
//!     let report = run_conformance_suite(|| async { spawn_client().await }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod concurrent;
mod crud;
mod error;
mod isolation;

use std::fmt;
use std::future::Future;

use millwright_core::ResourceKind;
use serde_json::{json, Value};

use crate::{key_of, ResourceApi};

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "crud", "error").
    pub category: String,
    pub name: String,
    pub passed: bool,
    /// Failure description when `passed` is false.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        let (passed, message) = match result {
            Ok(()) => (true, None),
            Err(msg) => (false, Some(msg)),
        };
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed,
            message,
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in self.results.iter().filter(|r| !r.passed) {
            writeln!(
                f,
                "  FAIL [{}/{}]: {}",
                r.category,
                r.name,
                r.message.as_deref().unwrap_or("(no message)")
            )?;
        }
        Ok(())
    }
}

/// Run the full conformance suite against a backend.
///
/// `factory` is called once per test, so every test starts from an empty
/// backend.
pub async fn run_conformance_suite<A, F, Fut>(factory: F) -> ConformanceReport
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let mut results = Vec::new();

    results.extend(crud::run_crud_tests(&factory).await);
    results.extend(error::run_error_tests(&factory).await);
    results.extend(isolation::run_isolation_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn plant_body(name: &str) -> Value {
    json!({
        "name": name,
        "location": "Sheffield",
        "contact_email": "ops@example.com",
        "contact_phone": "0114 000 0000"
    })
}

async fn create_plant<A: ResourceApi>(api: &A, name: &str) -> Result<String, String> {
    let created = api
        .create(ResourceKind::Plants, plant_body(name))
        .await
        .map_err(|e| format!("create '{name}' failed: {e}"))?;
    key_of(&created, ResourceKind::Plants)
        .ok_or_else(|| format!("created record has no plant_id: {created}"))
}

async fn plant_ids<A: ResourceApi>(api: &A) -> Result<Vec<String>, String> {
    let records = api
        .list(ResourceKind::Plants)
        .await
        .map_err(|e| format!("list failed: {e}"))?;
    Ok(records
        .iter()
        .filter_map(|r| key_of(r, ResourceKind::Plants))
        .collect())
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(message())
    }
}
