use std::future::Future;

use millwright_core::ResourceKind;
use serde_json::json;

use super::{create_plant, ensure, plant_ids, TestResult};
use crate::{key_of, ResourceApi};

pub(super) async fn run_isolation_tests<A, F, Fut>(factory: &F) -> Vec<TestResult>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    vec![
        TestResult::from_result(
            "isolation",
            "collections_are_independent",
            collections_are_independent(factory).await,
        ),
        TestResult::from_result(
            "isolation",
            "delete_in_one_collection_keeps_same_id_elsewhere",
            delete_in_one_collection_keeps_same_id_elsewhere(factory).await,
        ),
    ]
}

async fn collections_are_independent<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    create_plant(&api, "North").await?;
    api.create(ResourceKind::Vendors, json!({"name": "Acme"}))
        .await
        .map_err(|e| format!("create vendor failed: {e}"))?;
    let machines = api
        .list(ResourceKind::Machines)
        .await
        .map_err(|e| format!("list machines failed: {e}"))?;
    ensure(machines.is_empty(), || {
        format!("machines should be empty, got {machines:?}")
    })?;
    let plants = plant_ids(&api).await?;
    ensure(plants.len() == 1, || format!("expected one plant, got {plants:?}"))
}

/// Keys may collide across collections; deleting from one must not touch the
/// other.
async fn delete_in_one_collection_keeps_same_id_elsewhere<A, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let plant = create_plant(&api, "North").await?;
    let vendor = api
        .create(ResourceKind::Vendors, json!({"name": "Acme"}))
        .await
        .map_err(|e| format!("create vendor failed: {e}"))?;
    let vendor_id = key_of(&vendor, ResourceKind::Vendors)
        .ok_or_else(|| format!("vendor has no key: {vendor}"))?;
    api.delete(ResourceKind::Vendors, &vendor_id)
        .await
        .map_err(|e| format!("delete vendor failed: {e}"))?;
    let plants = plant_ids(&api).await?;
    ensure(plants == vec![plant.clone()], || {
        format!("plant {plant} should survive vendor delete, got {plants:?}")
    })
}
