use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_test::TestServer;
use serde_json::{Value, json};

use commons_content::infra::cms::HttpCmsClient;
use commons_content::router::build_router;
use commons_content::state::AppState;
use commons_testing::auth::MockAuth;

use crate::helpers::tag_json;

/// Stand-in for the CMS HTTP API, answering the handful of queries the
/// routes below issue.
#[derive(Clone, Default)]
struct FakeCms {
    mutations: Arc<Mutex<Vec<Value>>>,
    fail_writes: bool,
}

fn about_page() -> Value {
    json!({
        "_id": "page-about",
        "title": {"en": "About us", "es": "Sobre nosotros"},
        "slug": {"en": "about-us", "es": "sobre-nosotros"},
        "blocks": [
            {"_type": "hero", "heading": {"en": "Who we are", "es": "Quiénes somos"}, "ctaHref": "/join"},
            {"_type": "embed", "html": "<iframe>"},
            {"_type": "faq", "heading": {"en": "FAQ"}, "items": [{"question": {"en": "Free?"}, "answer": {"en": "Yes"}}]}
        ]
    })
}

async fn query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let groq = params.get("query").map(String::as_str).unwrap_or_default();
    let slug: Option<String> = params
        .get("$slug")
        .and_then(|raw| serde_json::from_str(raw).ok());

    let result = if groq == "1" {
        json!(1)
    } else if groq.contains(r#"_type == "page""#) {
        match slug.as_deref() {
            Some("about-us" | "sobre-nosotros") => about_page(),
            _ => Value::Null,
        }
    } else if groq.contains(r#"_type == "tag""#) {
        json!([tag_json("water"), tag_json("energy")])
    } else {
        json!([])
    };
    Json(json!({ "result": result }))
}

async fn mutate(State(fake): State<FakeCms>, Json(body): Json<Value>) -> Response {
    if fake.fail_writes {
        return (StatusCode::INTERNAL_SERVER_ERROR, "write failed").into_response();
    }
    fake.mutations.lock().unwrap().push(body);
    Json(json!({"transactionId": "tx-1"})).into_response()
}

async fn spawn_fake_cms(fake: FakeCms) -> String {
    let app = Router::new()
        .route("/v1/data/query/test", get(query))
        .route("/v1/data/mutate/test", post(mutate))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn server_for(cms_url: String) -> TestServer {
    let state = AppState {
        cms: HttpCmsClient::new(cms_url, "test".into(), "v1".into(), Some("sk_write".into()))
            .unwrap(),
        sessions: commons_testing::auth::verifier(),
    };
    TestServer::new(build_router(state)).unwrap()
}

async fn server(fake: FakeCms) -> TestServer {
    server_for(spawn_fake_cms(fake).await)
}

fn valid_submission() -> Value {
    json!({
        "title": "Rainwater tanks in Recife",
        "summary": "How forty households started harvesting rain.",
        "country": "BR",
        "contact_email": "coord@chuva.example.org",
        "tags": ["tag-water"]
    })
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_be_ready_when_cms_answers() {
    let server = server(FakeCms::default()).await;
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_not_be_ready_when_cms_is_unreachable() {
    let server = server_for("http://127.0.0.1:9".into());
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(
        server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

// ── Pages ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_render_page_in_requested_locale() {
    let server = server(FakeCms::default()).await;
    let response = server.get("/pages/sobre-nosotros?locale=es").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["locale"], "es");
    assert_eq!(body["title"], "Sobre nosotros");
    assert_eq!(body["slug"], "sobre-nosotros");
    assert_eq!(body["alternates"], json!({"en": "about-us", "es": "sobre-nosotros"}));

    let blocks = body["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["type"], "hero");
    assert_eq!(blocks[0]["heading"], "Quiénes somos");
    assert_eq!(blocks[1]["type"], "faq");
    assert_eq!(blocks[1]["items"][0]["answer"], "Yes");
}

#[tokio::test]
async fn should_redirect_to_canonical_slug_for_negotiated_locale() {
    let server = server(FakeCms::default()).await;
    let response = server
        .get("/pages/about-us")
        .add_header(header::ACCEPT_LANGUAGE, HeaderValue::from_static("es-MX, en;q=0.5"))
        .await;
    assert_eq!(response.status_code(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.header(header::LOCATION),
        "/pages/sobre-nosotros?locale=es"
    );
}

#[tokio::test]
async fn should_reject_unsupported_locale() {
    let server = server(FakeCms::default()).await;
    let response = server.get("/pages/about-us?locale=de").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_LOCALE");
}

#[tokio::test]
async fn should_return_404_for_unknown_page() {
    let server = server(FakeCms::default()).await;
    let response = server.get("/pages/contact").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "PAGE_NOT_FOUND");
}

// ── Listings ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_malformed_pagination() {
    let server = server(FakeCms::default()).await;
    let response = server.get("/news?per-page=many").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_QUERY");
}

#[tokio::test]
async fn should_return_empty_page_envelope() {
    let server = server(FakeCms::default()).await;
    let response = server.get("/case-studies?sort=title&per-page=5").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({"items": [], "page": 1, "per_page": 5, "total": 0})
    );
}

#[tokio::test]
async fn should_list_tags_with_resolved_labels() {
    let server = server(FakeCms::default()).await;
    let response = server.get("/tags").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!([
            {"id": "tag-energy", "slug": "energy", "label": "ENERGY"},
            {"id": "tag-water", "slug": "water", "label": "WATER"}
        ])
    );
}

// ── Submission ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_session_to_submit() {
    let server = server(FakeCms::default()).await;
    let response = server.post("/case-studies").json(&valid_submission()).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");

    let mine = server.get("/users/@me/case-studies").await;
    assert_eq!(mine.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_field_details_for_invalid_submission() {
    let server = server(FakeCms::default()).await;
    let auth = MockAuth::new("user_author");
    let response = server
        .post("/case-studies")
        .add_header(header::AUTHORIZATION, auth.bearer())
        .json(&json!({
            "title": "Rainwater tanks in Recife",
            "summary": "short",
            "contact_email": "coord@chuva.example.org"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    assert_eq!(body["details"][0]["field"], "summary");
    assert_eq!(body["details"][0]["code"], "length");
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let server = server(FakeCms::default()).await;
    let auth = MockAuth::new("user_author");
    let response = server
        .post("/case-studies")
        .add_header(header::AUTHORIZATION, auth.bearer())
        .json(&json!({"title": 42}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_BODY");
}

#[tokio::test]
async fn should_create_case_study_in_cms() {
    let fake = FakeCms::default();
    let server = server(fake.clone()).await;
    let auth = MockAuth::new("user_author");
    let response = server
        .post("/case-studies?locale=fr")
        .add_header(header::AUTHORIZATION, auth.bearer())
        .json(&valid_submission())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    let mutations = fake.mutations.lock().unwrap().clone();
    assert_eq!(mutations.len(), 1);
    let created = &mutations[0]["mutations"][0]["create"];
    assert_eq!(created["_id"], id.as_str());
    assert_eq!(created["_type"], "caseStudy");
    assert_eq!(created["status"], "in_review");
    assert_eq!(created["submittedBy"], "user_author");
    assert_eq!(created["submittedLocale"], "fr");
    assert_eq!(created["title"], json!({"fr": "Rainwater tanks in Recife"}));
    assert_eq!(created["tags"][0]["_ref"], "tag-water");
}

#[tokio::test]
async fn should_answer_503_when_cms_rejects_write() {
    let server = server(FakeCms {
        fail_writes: true,
        ..FakeCms::default()
    })
    .await;
    let auth = MockAuth::new("user_author");
    let response = server
        .post("/case-studies")
        .add_header(header::AUTHORIZATION, auth.bearer())
        .json(&valid_submission())
        .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["kind"], "SERVICE_UNAVAILABLE");
}
