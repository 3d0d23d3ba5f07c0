//! Signed identity-provider webhook requests.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use commons_auth::webhook::WebhookVerifier;

/// `whsec_` secret shared between tests and the service under test.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_dGVzdC13ZWJob29rLXNpZ25pbmcta2V5LTAwMDE=";

pub fn verifier() -> WebhookVerifier {
    WebhookVerifier::new(TEST_WEBHOOK_SECRET).expect("test secret is valid base64")
}

/// Headers for delivering `body` as a freshly signed webhook message.
pub fn signed_headers(body: &[u8]) -> HeaderMap {
    let id = format!("msg_{}", uuid::Uuid::new_v4().simple());
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = verifier()
        .sign(&id, &timestamp, body)
        .expect("test secret is valid");

    let mut map = HeaderMap::new();
    for (name, value) in [
        ("webhook-id", id),
        ("webhook-timestamp", timestamp),
        ("webhook-signature", signature),
    ] {
        map.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(&value).expect("ASCII header value"),
        );
    }
    map
}
