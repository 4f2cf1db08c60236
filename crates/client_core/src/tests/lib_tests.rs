use super::*;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{BaselineKind, ProductId},
    protocol::ImportOptions,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct CapturedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
struct CapturedImport {
    query: HashMap<String, String>,
    fields: Vec<CapturedField>,
}

#[derive(Clone, Default)]
struct ServerState {
    imports: Arc<Mutex<Vec<CapturedImport>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
    created: Arc<Mutex<Vec<Value>>>,
}

async fn list_products() -> Json<Value> {
    Json(json!([{ "id": "ENGINE" }, { "id": "WING", "description": "left wing" }]))
}

async fn list_product_baselines(Path((_ws, product)): Path<(String, String)>) -> Json<Value> {
    Json(json!([{
        "id": 3,
        "name": format!("{product}-snapshot"),
        "configurationItemId": product,
        "type": "LATEST"
    }]))
}

async fn list_all_baselines() -> Json<Value> {
    Json(json!([]))
}

async fn create_baseline(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.created.lock().await.push(body.clone());
    Json(json!({
        "id": 40,
        "name": body["name"],
        "configurationItemId": body["configurationItemId"],
        "type": body["type"]
    }))
}

async fn delete_baseline(
    State(state): State<ServerState>,
    Path((_ws, id)): Path<(String, i64)>,
) -> (StatusCode, String) {
    if id == 13 {
        return (
            StatusCode::CONFLICT,
            "Baseline 13 is referenced by a product instance".to_string(),
        );
    }
    state.deleted.lock().await.push(id);
    (StatusCode::NO_CONTENT, String::new())
}

async fn import_part(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> StatusCode {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.expect("field bytes").to_vec();
        fields.push(CapturedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.imports.lock().await.push(CapturedImport { query, fields });
    StatusCode::OK
}

async fn spawn_server() -> (ConsoleClient, ServerState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/workspaces/:ws/products", get(list_products))
        .route(
            "/api/workspaces/:ws/products/:product/baselines",
            get(list_product_baselines),
        )
        .route(
            "/api/workspaces/:ws/product-baselines",
            get(list_all_baselines).post(create_baseline),
        )
        .route(
            "/api/workspaces/:ws/product-baselines/:id",
            delete(delete_baseline),
        )
        .route("/api/workspaces/:ws/parts/import", post(import_part))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let config = ConsoleConfig {
        server_url: format!("http://{addr}"),
        workspace_id: "aero".into(),
        ..ConsoleConfig::default()
    };
    (ConsoleClient::new(config), state)
}

#[tokio::test]
async fn lists_product_ids() {
    let (client, _state) = spawn_server().await;
    let products = client.list_products().await.expect("products");
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["ENGINE", "WING"]);

    let items = client.list_configuration_items().await.expect("items");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn scoped_baseline_listing_uses_product_path() {
    let (client, _state) = spawn_server().await;
    let filter = ProductFilter::product(ProductId("ENGINE".into()));
    let baselines = client.list_baselines(&filter).await.expect("baselines");
    assert_eq!(baselines.len(), 1);
    assert_eq!(baselines[0].name, "ENGINE-snapshot");

    let all = client
        .list_baselines(&ProductFilter::all())
        .await
        .expect("all baselines");
    assert!(all.is_empty());
}

#[tokio::test]
async fn create_posts_json_body() {
    let (client, state) = spawn_server().await;
    let created = client
        .create_baseline(&BaselineCreationRequest {
            name: "v1".into(),
            description: None,
            configuration_item_id: ProductId("ENGINE".into()),
            kind: BaselineKind::Released,
        })
        .await
        .expect("create");
    assert_eq!(created.id, BaselineId(40));
    assert_eq!(created.kind, BaselineKind::Released);

    let bodies = state.created.lock().await;
    assert_eq!(
        bodies[0],
        json!({ "name": "v1", "configurationItemId": "ENGINE", "type": "RELEASED" })
    );
}

#[tokio::test]
async fn delete_failure_keeps_server_text() {
    let (client, state) = spawn_server().await;
    client
        .delete_baseline(BaselineId(5))
        .await
        .expect("delete ok");
    assert_eq!(*state.deleted.lock().await, vec![5]);

    let err = client
        .delete_baseline(BaselineId(13))
        .await
        .expect_err("should fail");
    let response = err.response().expect("api response");
    assert_eq!(response.status, 409);
    assert_eq!(
        response.display_text(),
        Some("Baseline 13 is referenced by a product instance")
    );
}

#[tokio::test]
async fn import_sends_single_upload_field_with_options() {
    let (client, state) = spawn_server().await;
    let url = client
        .config
        .part_import_url(&ImportOptions {
            auto_checkout: true,
            auto_checkin: true,
            permissive_update: false,
            revision_note: String::new(),
        })
        .expect("url");

    client
        .import_part(PartUpload {
            url,
            file_name: "bracket.step".into(),
            source: FileSource::Memory(b"ISO-10303-21;".to_vec()),
        })
        .await
        .expect("import");

    let imports = state.imports.lock().await;
    assert_eq!(imports.len(), 1);
    let import = &imports[0];
    assert_eq!(import.query.get("autoCheckout").map(String::as_str), Some("true"));
    assert_eq!(import.query.get("autoCheckin").map(String::as_str), Some("true"));
    assert_eq!(
        import.query.get("permissiveUpdate").map(String::as_str),
        Some("false")
    );
    assert_eq!(import.query.get("revisionNote").map(String::as_str), Some(""));
    assert_eq!(import.fields.len(), 1);
    assert_eq!(import.fields[0].name, UPLOAD_FIELD);
    assert_eq!(import.fields[0].file_name.as_deref(), Some("bracket.step"));
    assert_eq!(import.fields[0].bytes, b"ISO-10303-21;");
}

#[tokio::test]
async fn import_reads_file_from_disk() {
    let (client, state) = spawn_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("parts.csv");
    std::fs::write(&path, "number,name\nP-1,bolt\n").expect("write");
    let offered = OfferedFile::from_path(&path);
    assert_eq!(offered.name, "parts.csv");

    client
        .import_part(PartUpload {
            url: client
                .config
                .part_import_url(&ImportOptions::default())
                .expect("url"),
            file_name: offered.name,
            source: offered.source,
        })
        .await
        .expect("import");

    let imports = state.imports.lock().await;
    assert_eq!(imports[0].fields[0].bytes, b"number,name\nP-1,bolt\n");
    assert_eq!(imports[0].fields[0].content_type.as_deref(), Some("text/csv"));
}

#[tokio::test]
async fn import_of_missing_file_never_reaches_server() {
    let (client, state) = spawn_server().await;
    let err = client
        .import_part(PartUpload {
            url: client
                .config
                .part_import_url(&ImportOptions::default())
                .expect("url"),
            file_name: "gone.step".into(),
            source: FileSource::Path("/definitely/not/here/gone.step".into()),
        })
        .await
        .expect_err("should fail");
    assert!(matches!(err, ClientError::Io { .. }));
    assert!(state.imports.lock().await.is_empty());
}
