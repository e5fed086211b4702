use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use tradedesk_core::Module;
use tradedesk_kv::{KVStore, RedbStore};
use tradedesk_masters::MastersModule;

fn make_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&dir.path().join("masters.redb")).unwrap());
    let module = MastersModule::new(kv);
    let app = Router::new().nest(&format!("/{}", module.name()), module.routes());
    (app, dir)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn hsn_crud_over_http() {
    let (app, _dir) = make_app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/masters/hsn",
            serde_json::json!({"hsnCode": "5208", "gst": "5"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/masters/hsn/{}", id),
            serde_json::json!({"id": id, "hsnCode": "5208", "gst": "12"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/masters/hsn").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listed = body_json(resp).await;
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["items"][0]["gst"], "12");
}

#[tokio::test]
async fn invalid_transport_is_rejected() {
    let (app, _dir) = make_app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/masters/transports",
            serde_json::json!({"transportName": "Speedy Cargo", "phoneNo": "12345"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["message"], "Invalid phone number. Must be 10 digits.");

    let resp = app
        .oneshot(Request::builder().uri("/masters/transports").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["total"], 0);
}

#[tokio::test]
async fn unknown_agent_is_not_found() {
    let (app, _dir) = make_app();
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/masters/agents/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Agent 'missing' not found");
}
