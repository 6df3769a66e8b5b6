//! Tests for the HTTP registry client against an in-process registry.
//!
//! The test registry answers every request under `/{status}/...` with that status, so a client
//! pointed at `http://<addr>/503` sees a registry that is down and one pointed at
//! `http://<addr>/200` sees a registry that accepts everything.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use vercre_didwallet::error::Err;
use vercre_didwallet::{FileSystemStore, HttpRegistry, Registry, Store, Wallet};

// Request bodies received by the test registry, with the operation they were sent to.
type Received = Arc<Mutex<Vec<(String, Value)>>>;

// Start a test registry on an ephemeral port.
async fn serve() -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/{status}/ping", get(ping))
        .route("/{status}/did/{operation}", post(did_operation))
        .with_state(Arc::clone(&received));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("should have address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    (format!("http://{addr}"), received)
}

async fn ping(Path(status): Path<u16>) -> Response {
    reply(status)
}

async fn did_operation(
    State(received): State<Received>, Path((status, operation)): Path<(u16, String)>,
    Json(body): Json<Value>,
) -> Response {
    received.lock().expect("lock").push((operation, body));
    reply(status)
}

// 418 fails with a plain-text body, every other failure with a JSON error body.
fn reply(status: u16) -> Response {
    let Ok(status) = StatusCode::from_u16(status) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if status.is_success() {
        return status.into_response();
    }
    if status == StatusCode::IM_A_TEAPOT {
        return (status, "not a registry").into_response();
    }
    let body = json!({
        "error": "invalid_request",
        "error_description": "proof does not verify"
    });
    (status, Json(body)).into_response()
}

fn registry(base: &str, status: u16) -> HttpRegistry {
    test_utils::init_tracer();
    HttpRegistry::new(&format!("{base}/{status}"), Duration::from_secs(5)).expect("should create")
}

// Accepted requests: create and revoke carry the document and proof the wallet signed.
#[tokio::test]
async fn accepted() {
    let (base, received) = serve().await;
    let dir = tempfile::tempdir().expect("should create temp dir");
    let store = FileSystemStore::new(dir.path()).expect("should open store");
    let wallet = Wallet::new(store, registry(&base, 200));

    wallet.registry().ping().await.expect("should ping");
    let did = wallet.create_account().await.expect("should create account");
    wallet.remove_account(&did).await.expect("should remove account");
    assert!(wallet.store().list().expect("should list").is_empty());

    let received = received.lock().expect("lock").clone();
    assert_eq!(received.len(), 2);

    let (operation, create) = &received[0];
    assert_eq!(operation, "create");
    assert_eq!(create["did"], did);
    let document = &create["document"];
    assert_eq!(document["id"], did);
    assert_eq!(document["@context"], "https://www.w3.org/ns/did/v1");
    assert_eq!(document["authentication"], json!([format!("{did}#keys-1")]));
    assert_eq!(document["recovery"], json!([format!("{did}#keys-2")]));
    assert_eq!(document["proof"]["type"], "Ed25519");
    assert_eq!(document["proof"]["creator"], format!("{did}#keys-1"));
    assert!(document["proof"]["signatureValue"].is_string());

    let (operation, revoke) = &received[1];
    assert_eq!(operation, "revoke");
    assert_eq!(revoke["did"], did);
    assert_eq!(revoke["proof"]["type"], "Ed25519");
    assert_eq!(revoke["proof"]["creator"], format!("{did}#keys-2"));
    assert!(revoke["proof"]["signatureValue"].is_string());
}

// A refusal with an error body is not retryable and carries the registry's reason.
#[tokio::test]
async fn rejected_with_reason() {
    let (base, _) = serve().await;

    for status in [400, 409, 422] {
        let err = registry(&base, status).ping().await.expect_err("should fail");
        assert!(err.is(Err::RegistryRejected), "{status}");
        assert!(!err.code().expect("should have code").is_retryable());

        let msg = err.to_string();
        assert!(msg.contains("invalid_request"), "{msg}");
        assert!(msg.contains("proof does not verify"), "{msg}");
    }
}

// A refusal without a JSON body still reports the status and body text.
#[tokio::test]
async fn rejected_plain_body() {
    let (base, _) = serve().await;

    let err = registry(&base, 418).ping().await.expect_err("should fail");
    assert!(err.is(Err::RegistryRejected));
    let msg = err.to_string();
    assert!(msg.contains("418"), "{msg}");
    assert!(msg.contains("not a registry"), "{msg}");
}

// Server errors mean the registry could not serve the request.
#[tokio::test]
async fn server_errors() {
    let (base, _) = serve().await;

    for status in [500, 502, 503, 504] {
        let err = registry(&base, status).ping().await.expect_err("should fail");
        assert!(err.is(Err::RegistryUnavailable), "{status}");
        assert!(err.code().expect("should have code").is_retryable());
    }
}

// Registration failing because the registry is down leaves nothing in the store.
#[tokio::test]
async fn create_while_down() {
    let (base, received) = serve().await;
    let dir = tempfile::tempdir().expect("should create temp dir");
    let store = FileSystemStore::new(dir.path()).expect("should open store");
    let wallet = Wallet::new(store, registry(&base, 503));

    let err = wallet.create_account().await.expect_err("should fail");
    assert!(err.is(Err::RegistryUnavailable));
    assert!(wallet.store().list().expect("should list").is_empty());
    assert_eq!(received.lock().expect("lock").len(), 1);
}

// Nothing listens on port 1: registration fails before anything is stored.
#[tokio::test]
async fn create_unreachable() {
    test_utils::init_tracer();
    let dir = tempfile::tempdir().expect("should create temp dir");
    let store = FileSystemStore::new(dir.path()).expect("should open store");
    let registry =
        HttpRegistry::new("http://127.0.0.1:1", Duration::from_secs(2)).expect("should create");
    let wallet = Wallet::new(store, registry);

    let err = wallet.create_account().await.expect_err("should fail");
    assert!(err.is(Err::RegistryUnavailable));
    assert!(wallet.store().list().expect("should list").is_empty());
}
