use std::future::Future;

use millwright_core::ResourceKind;
use serde_json::json;

use super::{create_plant, ensure, plant_ids, TestResult};
use crate::{key_of, ResourceApi};

pub(super) async fn run_crud_tests<A, F, Fut>(factory: &F) -> Vec<TestResult>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    vec![
        TestResult::from_result(
            "crud",
            "empty_collection_lists_as_empty_array",
            empty_collection_lists_as_empty_array(factory).await,
        ),
        TestResult::from_result(
            "crud",
            "create_returns_record_with_string_key",
            create_returns_record_with_string_key(factory).await,
        ),
        TestResult::from_result(
            "crud",
            "list_preserves_creation_order",
            list_preserves_creation_order(factory).await,
        ),
        TestResult::from_result(
            "crud",
            "update_returns_server_representation",
            update_returns_server_representation(factory).await,
        ),
        TestResult::from_result(
            "crud",
            "update_keeps_list_position",
            update_keeps_list_position(factory).await,
        ),
        TestResult::from_result(
            "crud",
            "delete_removes_only_that_record",
            delete_removes_only_that_record(factory).await,
        ),
    ]
}

async fn empty_collection_lists_as_empty_array<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    for kind in ResourceKind::ALL {
        let records = api
            .list(kind)
            .await
            .map_err(|e| format!("list {kind} failed: {e}"))?;
        ensure(records.is_empty(), || {
            format!("expected empty {kind}, got {} records", records.len())
        })?;
    }
    Ok(())
}

async fn create_returns_record_with_string_key<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let created = api
        .create(
            ResourceKind::Machines,
            json!({"name": "Press 1", "model": "HX", "manufacturer": "Acme", "serial_number": "S1"}),
        )
        .await
        .map_err(|e| format!("create failed: {e}"))?;
    ensure(created["machine_id"].is_string(), || {
        format!("machine_id should be a string, got {}", created["machine_id"])
    })?;
    ensure(created["name"] == "Press 1", || {
        format!("name not echoed back: {created}")
    })
}

async fn list_preserves_creation_order<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let a = create_plant(&api, "A").await?;
    let b = create_plant(&api, "B").await?;
    let c = create_plant(&api, "C").await?;
    let ids = plant_ids(&api).await?;
    ensure(ids == vec![a.clone(), b.clone(), c.clone()], || {
        format!("expected [{a}, {b}, {c}], got {ids:?}")
    })
}

async fn update_returns_server_representation<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let id = create_plant(&api, "Old").await?;
    let updated = api
        .update(
            ResourceKind::Plants,
            &id,
            json!({"plant_id": id, "name": "New", "location": "Derby"}),
        )
        .await
        .map_err(|e| format!("update failed: {e}"))?;
    ensure(key_of(&updated, ResourceKind::Plants).as_deref() == Some(id.as_str()), || {
        format!("update changed the key: {updated}")
    })?;
    ensure(updated["name"] == "New" && updated["location"] == "Derby", || {
        format!("update not applied: {updated}")
    })
}

async fn update_keeps_list_position<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    create_plant(&api, "A").await?;
    let b = create_plant(&api, "B").await?;
    create_plant(&api, "C").await?;
    let before = plant_ids(&api).await?;
    api.update(ResourceKind::Plants, &b, json!({"plant_id": b, "name": "B2"}))
        .await
        .map_err(|e| format!("update failed: {e}"))?;
    let after = plant_ids(&api).await?;
    ensure(before == after, || {
        format!("order changed by update: {before:?} -> {after:?}")
    })
}

async fn delete_removes_only_that_record<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let a = create_plant(&api, "A").await?;
    let b = create_plant(&api, "B").await?;
    let c = create_plant(&api, "C").await?;
    api.delete(ResourceKind::Plants, &b)
        .await
        .map_err(|e| format!("delete failed: {e}"))?;
    let ids = plant_ids(&api).await?;
    ensure(ids == vec![a.clone(), c.clone()], || {
        format!("expected [{a}, {c}] after delete, got {ids:?}")
    })
}
