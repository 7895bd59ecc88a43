use std::future::Future;

use millwright_core::ResourceKind;
use serde_json::json;

use super::{create_plant, ensure, plant_ids, TestResult};
use crate::{ApiError, ResourceApi};

pub(super) async fn run_error_tests<A, F, Fut>(factory: &F) -> Vec<TestResult>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    vec![
        TestResult::from_result(
            "error",
            "update_unknown_id_is_404_with_message",
            update_unknown_id_is_404_with_message(factory).await,
        ),
        TestResult::from_result(
            "error",
            "delete_unknown_id_is_404_with_message",
            delete_unknown_id_is_404_with_message(factory).await,
        ),
        TestResult::from_result(
            "error",
            "failed_delete_leaves_collection_unchanged",
            failed_delete_leaves_collection_unchanged(factory).await,
        ),
        TestResult::from_result(
            "error",
            "double_delete_fails_second_time",
            double_delete_fails_second_time(factory).await,
        ),
    ]
}

fn expect_404_with_message(result: Result<(), ApiError>, what: &str) -> Result<(), String> {
    match result {
        Ok(()) => Err(format!("{what} succeeded, expected 404")),
        Err(e) if e.status_code() == Some(404) && e.server_message().is_some() => Ok(()),
        Err(e) => Err(format!("{what}: expected 404 with message, got {e:?}")),
    }
}

async fn update_unknown_id_is_404_with_message<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let result = api
        .update(ResourceKind::Vendors, "does-not-exist", json!({"name": "x"}))
        .await
        .map(|_| ());
    expect_404_with_message(result, "update of unknown vendor")
}

async fn delete_unknown_id_is_404_with_message<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let result = api.delete(ResourceKind::Machines, "does-not-exist").await;
    expect_404_with_message(result, "delete of unknown machine")
}

async fn failed_delete_leaves_collection_unchanged<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    create_plant(&api, "A").await?;
    create_plant(&api, "B").await?;
    let before = plant_ids(&api).await?;
    let _ = api.delete(ResourceKind::Plants, "does-not-exist").await;
    let after = plant_ids(&api).await?;
    ensure(before == after, || {
        format!("failed delete changed the list: {before:?} -> {after:?}")
    })
}

async fn double_delete_fails_second_time<A, F, Fut>(factory: &F) -> Result<(), String>
where
    A: ResourceApi,
    F: Fn() -> Fut,
    Fut: Future<Output = A>,
{
    let api = factory().await;
    let id = create_plant(&api, "A").await?;
    api.delete(ResourceKind::Plants, &id)
        .await
        .map_err(|e| format!("first delete failed: {e}"))?;
    let second = api.delete(ResourceKind::Plants, &id).await;
    expect_404_with_message(second, "second delete")
}
