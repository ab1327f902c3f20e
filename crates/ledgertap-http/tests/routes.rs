//! Submission surface tests, driven through the router with a mock ledger.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ledgertap_http::{router, AppState, Config};
use ledgertap_ledger::{Digest, LedgerError, LedgerService, TransactionId};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ─── Mock ledger ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct MockLedger {
    committed: Mutex<Vec<(String, Value)>>,
    fail_commits: bool,
    digest: Option<Digest>,
}

#[async_trait]
impl LedgerService for MockLedger {
    async fn get_digest(&self, _ledger: &str) -> Result<Digest, LedgerError> {
        self.digest.clone().ok_or(LedgerError::MissingTipAddress)
    }

    async fn insert_document(
        &self,
        table: &str,
        document: &Value,
    ) -> Result<TransactionId, LedgerError> {
        if self.fail_commits {
            return Err(LedgerError::CommitRejected {
                reason: "table is read-only".into(),
            });
        }
        self.committed
            .lock()
            .unwrap()
            .push((table.to_owned(), document.clone()));
        Ok(TransactionId("tx1".into()))
    }
}

fn test_config() -> Config {
    Config {
        ledger: "audit-ledger".into(),
        table: "Orders".into(),
        ledger_endpoint: "http://localhost:8081".into(),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
    }
}

fn app(ledger: Arc<MockLedger>) -> Router {
    router(AppState::new(ledger, test_config()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ─── POST /documents ──────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_submission_commits_and_returns_204() {
    let ledger = Arc::new(MockLedger::default());
    let response = app(ledger.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/documents")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"sku":"X","qty":2}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let committed = ledger.committed.lock().unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].0, "Orders");
    assert_eq!(committed[0].1, json!({"sku": "X", "qty": 2}));
}

#[tokio::test]
async fn wrong_content_type_is_rejected_with_400() {
    let response = app(Arc::new(MockLedger::default()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/documents")
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"sku":"X"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"message": "You must send a content-type header of application/json"})
    );
}

#[tokio::test]
async fn unparsable_body_is_rejected_with_400() {
    let response = app(Arc::new(MockLedger::default()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/documents")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Request body must be a valid JSON object"})
    );
}

#[tokio::test]
async fn non_object_body_is_rejected_with_400() {
    let response = app(Arc::new(MockLedger::default()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/documents")
                .header("content-type", "application/json")
                .body(Body::from("[1,2,3]"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ledger_failure_surfaces_as_400_with_message() {
    let ledger = Arc::new(MockLedger {
        fail_commits: true,
        ..MockLedger::default()
    });
    let response = app(ledger)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/documents")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"sku":"X"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Ledger commit rejected: table is read-only"
    );
}

// ─── GET /digest ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn digest_is_returned_when_available() {
    let ledger = Arc::new(MockLedger {
        digest: Some(Digest {
            digest: "qxI=".into(),
            tip_address: "{strandId:\"s1\",sequenceNo:5}".into(),
        }),
        ..MockLedger::default()
    });
    let response = app(ledger)
        .oneshot(
            Request::builder()
                .uri("/digest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"digest": "qxI=", "tipAddress": "{strandId:\"s1\",sequenceNo:5}"})
    );
}

#[tokio::test]
async fn digest_failure_returns_generic_message_only() {
    // Mock reports the tip address missing from the upstream response.
    let response = app(Arc::new(MockLedger::default()))
        .oneshot(
            Request::builder()
                .uri("/digest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Something went wrong and no digest was produced, check the logs for more info"})
    );
}
