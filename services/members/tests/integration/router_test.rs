use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};

use commons_core::middleware::REQUEST_ID_HEADER;
use commons_members::infra::identity::HttpIdentityProvider;
use commons_members::infra::storage::S3AvatarStore;
use commons_members::router::build_router;
use commons_members::state::AppState;
use commons_testing::auth::MockAuth;
use commons_testing::webhook::signed_headers;

/// State whose database and object store are unreachable; every route
/// exercised here must answer before touching them or fail cleanly.
fn offline_state() -> AppState {
    let s3 = aws_sdk_s3::Client::from_conf(
        aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build(),
    );
    AppState {
        db: sea_orm::DatabaseConnection::Disconnected,
        avatars: S3AvatarStore {
            client: s3,
            bucket: "avatars".into(),
            public_base_url: "https://cdn.test".into(),
        },
        identity: HttpIdentityProvider::new("http://127.0.0.1:9".into(), "sk_test".into())
            .unwrap(),
        sessions: commons_testing::auth::verifier(),
        webhooks: Arc::new(commons_testing::webhook::verifier()),
    }
}

fn server() -> TestServer {
    TestServer::new(build_router(offline_state())).unwrap()
}

async fn post_webhook(server: &TestServer, body: &Value) -> axum_test::TestResponse {
    let raw = serde_json::to_vec(body).unwrap();
    let mut request = server.post("/webhooks/identity");
    for (name, value) in signed_headers(&raw).iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .bytes(raw.into())
        .await
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_live_but_not_ready_without_database() {
    let server = server();
    let live = server.get("/healthz").await;
    assert_eq!(live.status_code(), StatusCode::OK);
    assert!(live.headers().contains_key(REQUEST_ID_HEADER));

    let ready = server.get("/readyz").await;
    assert_eq!(ready.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

// ── Authentication ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_session_for_own_profile() {
    let server = server();
    let response = server.get("/users/@me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_require_session_before_reading_mutation_bodies() {
    let server = server();
    let patch = server
        .patch("/users/@me")
        .json(&json!({"bio": "hello"}))
        .await;
    assert_eq!(patch.status_code(), StatusCode::UNAUTHORIZED);

    let create = server
        .post("/users/@me/recent-works")
        .json(&json!({"title": "x", "start_date": "2025-01-01"}))
        .await;
    assert_eq!(create.status_code(), StatusCode::UNAUTHORIZED);

    let join = server.post("/communities/soil-lab/members").await;
    assert_eq!(join.status_code(), StatusCode::UNAUTHORIZED);

    let avatar = server.delete("/users/@me/avatar").await;
    assert_eq!(avatar.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_expired_session() {
    let server = server();
    let expired = MockAuth::random().token_expiring_in(-3600);
    let response = server
        .get("/users/@me")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {expired}")).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ── Username availability ────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_reserved_username_without_lookup() {
    let server = server();
    let response = server.get("/usernames/Admin/availability").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["available"], false);
    assert_eq!(body["reason"], "reserved");
}

// ── Identity webhook ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_unsigned_webhook() {
    let server = server();
    let response = server
        .post("/webhooks/identity")
        .json(&json!({"type": "user.created", "data": {"id": "user_1"}}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["kind"],
        "INVALID_WEBHOOK_SIGNATURE"
    );
}

#[tokio::test]
async fn should_reject_webhook_signed_for_other_body() {
    let server = server();
    let signed = signed_headers(br#"{"type":"user.deleted","data":{"id":"user_1"}}"#);
    let mut request = server.post("/webhooks/identity");
    for (name, value) in signed.iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    let response = request
        .bytes(br#"{"type":"user.deleted","data":{"id":"user_2"}}"#.to_vec().into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_acknowledge_ignored_event_types() {
    let server = server();
    let response = post_webhook(
        &server,
        &json!({"type": "organization.created", "data": {"id": "org_1"}}),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["action"], "ignored");
}

#[tokio::test]
async fn should_ask_for_redelivery_when_database_is_down() {
    let server = server();
    let response = post_webhook(
        &server,
        &json!({
            "type": "user.created",
            "data": {
                "id": "user_1",
                "email_addresses": [{"id": "idn_1", "email_address": "a@example.org"}],
                "primary_email_address_id": "idn_1"
            }
        }),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["kind"], "SERVICE_UNAVAILABLE");
}
