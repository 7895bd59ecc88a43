//! Resource card behavior against the in-memory API.

use std::sync::Arc;

use async_trait::async_trait;
use millwright_api::{ApiError, ApiOperation, MemoryApi, ResourceApi};
use millwright_card::{DeleteOutcome, LoadState, Notice, NoticeKind, ResourceCard};
use millwright_core::{Machine, ResourceKind, WorkOrder};
use serde_json::{json, Value};

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn seeded() -> MemoryApi {
    let api = MemoryApi::new();
    api.seed(
        ResourceKind::Plants,
        vec![
            json!({"plant_id": "10", "name": "North Works"}),
            json!({"plant_id": "11", "name": "South Works"}),
        ],
    );
    api.seed(
        ResourceKind::Machines,
        vec![
            json!({"machine_id": "1", "name": "Pump A", "model": "P-100",
                   "manufacturer": "Acme", "serial_number": "SN1", "plant_id": "10"}),
            json!({"machine_id": "2", "name": "Pump B", "model": "P-200",
                   "manufacturer": "Acme", "serial_number": "SN2", "plant_id": null}),
            json!({"machine_id": "3", "name": "Lathe", "model": "L-1",
                   "manufacturer": "Bolt", "serial_number": "SN3", "plant_id": "11"}),
        ],
    );
    api
}

async fn machines(api: &MemoryApi) -> ResourceCard<Machine, MemoryApi> {
    ResourceCard::mount(Arc::new(api.clone())).await
}

fn ids(card: &ResourceCard<Machine, MemoryApi>) -> Vec<String> {
    card.records().iter().map(|m| m.machine_id.clone()).collect()
}

// ── Fetcher ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_commits_records_and_references() {
    let api = seeded();
    let card = machines(&api).await;
    assert_eq!(card.load_state(), LoadState::Loaded);
    assert_eq!(ids(&card), ["1", "2", "3"]);
    assert_eq!(card.options(ResourceKind::Plants).len(), 2);
    assert!(card.notice().is_none());
    assert_eq!(api.request_count(ResourceKind::Plants, ApiOperation::List), 1);
}

#[tokio::test]
async fn failed_reference_load_commits_nothing() {
    let api = seeded();
    api.fail(
        ResourceKind::Plants,
        ApiOperation::List,
        ApiError::status(500, "database unavailable"),
    );
    let card = machines(&api).await;

    assert_eq!(card.load_state(), LoadState::Failed);
    assert!(card.records().is_empty());
    assert!(card.options(ResourceKind::Plants).is_empty());
    let notice = card.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.starts_with("Failed to load data: "));
    assert!(notice.message.contains("database unavailable"));
}

#[tokio::test]
async fn reload_after_failure_recovers() {
    let api = seeded();
    api.fail(
        ResourceKind::Machines,
        ApiOperation::List,
        ApiError::transport("connection refused"),
    );
    let mut card = machines(&api).await;
    assert!(card.records().is_empty());

    api.clear_failures();
    assert!(card.load().await);
    assert_eq!(ids(&card), ["1", "2", "3"]);
}

#[tokio::test]
async fn undecodable_list_is_a_load_failure() {
    let api = seeded();
    api.seed(ResourceKind::Machines, vec![json!({"machine_id": "4", "name": 7})]);
    let card = machines(&api).await;
    assert_eq!(card.load_state(), LoadState::Failed);
    assert!(card.records().is_empty());
}

// ── Filter view and export ───────────────────────────────────────────────────

#[tokio::test]
async fn local_search_narrows_case_insensitively() {
    let api = MemoryApi::new();
    api.seed(
        ResourceKind::Machines,
        vec![
            json!({"machine_id": "1", "name": "Pump A"}),
            json!({"machine_id": "2", "name": "Pump B"}),
        ],
    );
    let mut card = machines(&api).await;
    card.set_local_search("pump b");
    let visible: Vec<&str> = card.visible().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(visible, ["Pump B"]);
}

#[tokio::test]
async fn global_search_covers_embedded_names() {
    let api = MemoryApi::new();
    api.seed(
        ResourceKind::WorkOrders,
        vec![
            json!({"work_order_id": "1", "title": "Replace belt", "status": "pending",
                   "machine": {"machine_id": "m1", "name": "Conveyor 3"}}),
            json!({"work_order_id": "2", "title": "Oil change", "status": "pending",
                   "assignedUser": {"user_id": "u1", "username": "jdoe"}}),
        ],
    );
    let mut card: ResourceCard<WorkOrder, _> = ResourceCard::mount(Arc::new(api)).await;

    card.set_global_search("JDOE");
    assert_eq!(card.visible().len(), 1);
    assert_eq!(card.visible()[0].work_order_id, "2");

    card.set_local_search("jdoe");
    assert!(card.visible().is_empty());
}

#[tokio::test]
async fn export_renders_the_filtered_projection() {
    let api = seeded();
    let mut card = machines(&api).await;
    card.set_local_search("pump");
    let export = card.export();
    assert_eq!(export.file_name, "machines.csv");
    assert_eq!(
        export.contents,
        "Name,Model,Manufacturer,Serial Number,Plant\n\
         Pump A,P-100,Acme,SN1,North Works\n\
         Pump B,P-200,Acme,SN2,N/A"
    );
    assert_eq!(api.total_requests(), 2);
}

// ── Mutation controller ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_appends_server_record_and_resets_form() {
    let api = seeded();
    let mut card = machines(&api).await;
    card.open_form();
    card.draft_mut().name = "Press 7".into();
    card.draft_mut().plant_id = Some("10".into());

    let created = card.create().await.unwrap();
    assert!(!["1", "2", "3"].contains(&created.machine_id.as_str()));
    assert_eq!(card.records().len(), 4);
    assert_eq!(card.records().last(), Some(&created));
    assert!(!card.is_form_open());
    assert_eq!(card.draft().name, "");
    assert_eq!(
        card.notice(),
        Some(&Notice::success("Machine added successfully!"))
    );
}

#[tokio::test]
async fn failed_create_keeps_store_and_shows_server_message() {
    let api = seeded();
    let mut card = machines(&api).await;
    api.fail(
        ResourceKind::Machines,
        ApiOperation::Create,
        ApiError::status(400, "duplicate serial"),
    );
    card.open_form();
    card.draft_mut().name = "Pump A".into();

    assert!(card.create().await.is_none());
    assert_eq!(ids(&card), ["1", "2", "3"]);
    assert!(card.is_form_open());
    assert_eq!(card.draft().name, "Pump A");
    assert_eq!(card.notice(), Some(&Notice::error("duplicate serial")));
}

#[tokio::test]
async fn transport_failure_uses_generic_message() {
    let api = seeded();
    let mut card = machines(&api).await;
    api.fail(
        ResourceKind::Machines,
        ApiOperation::Create,
        ApiError::transport("connection reset"),
    );
    card.create().await;
    assert_eq!(card.notice(), Some(&Notice::error("Failed to add machine")));
}

#[tokio::test]
async fn update_replaces_in_place() {
    let api = seeded();
    let mut card = machines(&api).await;
    let mut edited = card.get("2").unwrap().clone();
    edited.name = "Pump B (rebuilt)".into();

    let updated = card.update(edited).await.unwrap();
    assert_eq!(ids(&card), ["1", "2", "3"]);
    assert_eq!(card.records()[1], updated);
    assert_eq!(card.records()[1].name, "Pump B (rebuilt)");
    assert_eq!(
        card.notice(),
        Some(&Notice::success("Machine updated successfully!"))
    );
}

#[tokio::test]
async fn edit_form_round_trip() {
    let api = seeded();
    let mut card = machines(&api).await;
    assert!(!card.begin_edit("99"));
    assert!(card.begin_edit("3"));
    card.editing_mut().unwrap().model = "L-2".into();

    let saved = card.save_edit().await.unwrap();
    assert_eq!(saved.model, "L-2");
    assert!(card.editing().is_none());
    assert_eq!(card.get("3").unwrap().model, "L-2");
}

#[tokio::test]
async fn failed_update_keeps_store() {
    let api = seeded();
    let mut card = machines(&api).await;
    api.fail(
        ResourceKind::Machines,
        ApiOperation::Update,
        ApiError::Status {
            status: 500,
            message: None,
        },
    );
    let before: Vec<Machine> = card.records().to_vec();
    let mut edited = before[0].clone();
    edited.name = "changed".into();

    assert!(card.update(edited).await.is_none());
    assert_eq!(card.records(), before.as_slice());
    assert_eq!(card.notice(), Some(&Notice::error("Failed to update machine")));
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let api = seeded();
    let mut card = machines(&api).await;
    let mut prompts = Vec::new();
    let outcome = card
        .delete("2", &mut |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        })
        .await;

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(prompts, ["Are you sure you want to delete this machine?"]);
    assert_eq!(api.request_count(ResourceKind::Machines, ApiOperation::Delete), 0);
    assert_eq!(ids(&card), ["1", "2", "3"]);
    assert!(card.notice().is_none());
}

#[tokio::test]
async fn confirmed_delete_removes_only_that_record() {
    let api = seeded();
    let mut card = machines(&api).await;
    assert_eq!(card.delete("2", &mut true).await, DeleteOutcome::Deleted);
    assert_eq!(ids(&card), ["1", "3"]);
    assert_eq!(
        card.notice(),
        Some(&Notice::success("Machine deleted successfully!"))
    );
}

#[tokio::test]
async fn delete_of_missing_record_surfaces_404_message() {
    let api = seeded();
    let mut card = machines(&api).await;
    api.seed(ResourceKind::Machines, vec![]);
    assert_eq!(card.delete("42", &mut true).await, DeleteOutcome::Failed);
    assert_eq!(card.notice(), Some(&Notice::error("Machine not found")));
    assert_eq!(card.records().len(), 3);
}

#[tokio::test]
async fn newer_notice_replaces_older_and_can_be_dismissed() {
    let api = seeded();
    let mut card = machines(&api).await;
    card.delete("1", &mut true).await;
    assert!(!card.notice().unwrap().is_error());

    card.delete("1", &mut true).await;
    assert!(card.notice().unwrap().is_error());

    card.dismiss_notice();
    assert!(card.notice().is_none());
}

// ── Decode failures ──────────────────────────────────────────────────────────

/// Answers every call with the same body.
struct FixedBody(Value);

#[async_trait]
impl ResourceApi for FixedBody {
    async fn list(&self, _kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        Ok(Vec::new())
    }

    async fn create(&self, _kind: ResourceKind, _body: Value) -> Result<Value, ApiError> {
        Ok(self.0.clone())
    }

    async fn update(&self, _kind: ResourceKind, _id: &str, _body: Value) -> Result<Value, ApiError> {
        Ok(self.0.clone())
    }

    async fn delete(&self, _kind: ResourceKind, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

#[tokio::test]
async fn undecodable_create_response_is_a_generic_failure() {
    let mut card: ResourceCard<Machine, _> =
        ResourceCard::mount(Arc::new(FixedBody(json!({"ok": true})))).await;
    card.open_form();
    assert!(card.create().await.is_none());
    assert!(card.records().is_empty());
    assert!(card.is_form_open());
    assert_eq!(card.notice(), Some(&Notice::error("Failed to add machine")));
}
