//! `HttpApi` and `AuthClient` against an in-process mock server.

use async_trait::async_trait;
use millwright_api::conformance::run_conformance_suite;
use millwright_api::{ApiError, ApiOperation, MemoryApi, ResourceApi};
use millwright_core::{NewUser, ResourceKind, Role};
use millwright_http::{AuthClient, ClientConfig, HttpApi};
use millwright_mock_server::{spawn, Credentials, SpawnedServer};
use serde_json::{json, Value};

/// An `HttpApi` that keeps its server alive for as long as it exists.
struct Served {
    api: HttpApi,
    _server: SpawnedServer,
}

#[async_trait]
impl ResourceApi for Served {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        self.api.list(kind).await
    }

    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        self.api.create(kind, body).await
    }

    async fn update(&self, kind: ResourceKind, id: &str, body: Value) -> Result<Value, ApiError> {
        self.api.update(kind, id, body).await
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        self.api.delete(kind, id).await
    }
}

fn admin() -> Credentials {
    Credentials {
        email: "admin@example.com".into(),
        password: "hunter2".into(),
    }
}

#[tokio::test]
async fn http_api_passes_conformance_suite() {
    let report = run_conformance_suite(|| async {
        let server = spawn(MemoryApi::new(), None).await.unwrap();
        Served {
            api: HttpApi::new(&ClientConfig::new(server.base_url())),
            _server: server,
        }
    })
    .await;
    assert_eq!(report.failed, 0, "{report}");
}

#[tokio::test]
async fn server_message_is_surfaced_on_failure() {
    let backend = MemoryApi::new();
    backend.fail(
        ResourceKind::Machines,
        ApiOperation::Create,
        ApiError::status(400, "duplicate serial"),
    );
    let server = spawn(backend, None).await.unwrap();
    let api = HttpApi::new(&ClientConfig::new(server.base_url()));

    let err = api
        .create(ResourceKind::Machines, json!({"name": "Press"}))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::status(400, "duplicate serial"));
}

#[tokio::test]
async fn login_then_resource_access_then_logout() {
    let server = spawn(MemoryApi::new(), Some(admin())).await.unwrap();
    let api = HttpApi::new(&ClientConfig::new(server.base_url()));
    let auth = AuthClient::new(api.clone());

    let err = api.list(ResourceKind::Plants).await.unwrap_err();
    assert!(err.is_unauthorized());

    let err = auth.login("admin@example.com", "nope").await.unwrap_err();
    assert_eq!(err.server_message(), Some("Invalid email or password"));
    assert!(!api.session().is_active());

    let token = auth.login("admin@example.com", "hunter2").await.unwrap();
    assert_eq!(api.session().token().as_deref(), Some(token.as_str()));
    assert!(api
        .session()
        .cookie_header()
        .unwrap()
        .contains(&format!("token={token}")));

    assert!(api.list(ResourceKind::Plants).await.unwrap().is_empty());
    let me = auth.me().await.unwrap();
    assert_eq!(me["email"], "admin@example.com");

    auth.logout().await.unwrap();
    assert!(!api.session().is_active());
    assert!(api.list(ResourceKind::Plants).await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn rejected_token_clears_the_session() {
    let server = spawn(MemoryApi::new(), Some(admin())).await.unwrap();
    let mut config = ClientConfig::new(server.base_url());
    config.token = Some("stale-token".into());
    let api = HttpApi::new(&config);
    assert!(api.session().is_active());

    let err = api.list(ResourceKind::Vendors).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!api.session().is_active());
}

#[tokio::test]
async fn register_creates_user_without_password() {
    let backend = MemoryApi::new();
    let server = spawn(backend.clone(), None).await.unwrap();
    let auth = AuthClient::new(HttpApi::new(&ClientConfig::new(server.base_url())));

    let user = NewUser {
        username: "jdoe".into(),
        email: "jdoe@example.com".into(),
        password: "s3cret".into(),
        role: Role::Manager,
        plant_id: None,
    };
    let created = auth.register(&user).await.unwrap();
    assert_eq!(created["username"], "jdoe");
    assert_eq!(created["role"], "manager");

    let stored = backend.records(ResourceKind::Users);
    assert_eq!(stored.len(), 1);
    assert!(stored[0].get("password").is_none());

    let err = auth.register(&NewUser::default()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(400));
}

#[tokio::test]
async fn ids_are_sent_as_a_single_path_segment() {
    let backend = MemoryApi::new();
    backend.seed(
        ResourceKind::Plants,
        vec![
            json!({"plant_id": "1", "name": "North"}),
            json!({"plant_id": "a b/#c", "name": "Odd"}),
        ],
    );
    let server = spawn(backend.clone(), None).await.unwrap();
    let api = HttpApi::new(&ClientConfig::new(server.base_url()));

    let err = api.delete(ResourceKind::Plants, "1?also=x").await.unwrap_err();
    assert_eq!(err, ApiError::status(404, "Plant not found"));
    let err = api
        .update(ResourceKind::Plants, "1#frag", json!({"name": "Moved"}))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(backend.records(ResourceKind::Plants).len(), 2);
    assert_eq!(backend.records(ResourceKind::Plants)[0]["name"], "North");

    api.delete(ResourceKind::Plants, "a b/#c").await.unwrap();
    let remaining = backend.records(ResourceKind::Plants);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["plant_id"], "1");
}
