use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use millwright_core::ResourceKind;

use super::{ensure, plant_body, plant_ids, TestResult};
use crate::{key_of, ResourceApi};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<A, F, Fut>(factory: &F) -> Vec<TestResult>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    vec![TestResult::from_result(
        "concurrent",
        "concurrent_creates_get_distinct_keys",
        concurrent_creates_get_distinct_keys(factory).await,
    )]
}

// ── Concurrent create: every record gets its own key ────────────────────────

/// N tasks create a plant at the same time. All must succeed, every key must
/// be unique, and the list must contain exactly those keys.
async fn concurrent_creates_get_distinct_keys<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = Arc::new(factory().await);

    let mut handles = Vec::with_capacity(N);
    for i in 0..N {
        let api = Arc::clone(&api);
        handles.push(tokio::spawn(async move {
            api.create(ResourceKind::Plants, plant_body(&format!("Plant {i}")))
                .await
        }));
    }

    let mut keys = HashSet::new();
    for handle in handles {
        let created = handle
            .await
            .map_err(|e| format!("task panicked: {e}"))?
            .map_err(|e| format!("create failed: {e}"))?;
        let key = key_of(&created, ResourceKind::Plants)
            .ok_or_else(|| format!("created record has no key: {created}"))?;
        ensure(keys.insert(key.clone()), || format!("duplicate key {key}"))?;
    }

    let listed: HashSet<String> = plant_ids(api.as_ref()).await?.into_iter().collect();
    ensure(listed == keys, || {
        format!("listed keys {listed:?} differ from created {keys:?}")
    })
}
