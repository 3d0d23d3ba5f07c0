use serde_json::json;

use commons_members::error::MembersServiceError;
use commons_members::usecase::webhook::{
    HandleIdentityEventUseCase, IdentityEvent, WebhookOutcome,
};

use crate::helpers::{MockUserRepo, test_user_named};

fn event(value: serde_json::Value) -> IdentityEvent {
    serde_json::from_value(value).unwrap()
}

fn user_created(id: &str, email: &str, username: Option<&str>) -> IdentityEvent {
    event(json!({
        "type": "user.created",
        "data": {
            "id": id,
            "email_addresses": [{"id": "idn_1", "email_address": email}],
            "primary_email_address_id": "idn_1",
            "first_name": "Grace",
            "last_name": "Hopper",
            "username": username
        }
    }))
}

#[tokio::test]
async fn should_keep_one_row_for_repeated_created_events() {
    let repo = MockUserRepo::empty();
    let users = repo.handle();
    let usecase = HandleIdentityEventUseCase { repo };

    let first = usecase
        .execute(user_created("user_1", "grace@example.org", Some("grace")))
        .await
        .unwrap();
    let second = usecase
        .execute(user_created("user_1", "grace@example.org", Some("grace")))
        .await
        .unwrap();

    assert_eq!(first, second);
    let users = users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name.as_deref(), Some("Grace Hopper"));
    assert_eq!(users[0].username.as_deref(), Some("grace"));
}

#[tokio::test]
async fn should_refresh_email_on_update() {
    let repo = MockUserRepo::empty();
    let users = repo.handle();
    let usecase = HandleIdentityEventUseCase { repo };

    usecase
        .execute(user_created("user_1", "old@example.org", None))
        .await
        .unwrap();
    let mut updated = user_created("user_1", "new@example.org", None);
    updated.event_type = "user.updated".into();
    usecase.execute(updated).await.unwrap();

    assert_eq!(users.lock().unwrap()[0].email, "new@example.org");
}

#[tokio::test]
async fn should_not_adopt_username_owned_by_someone_else() {
    let repo = MockUserRepo::new(vec![test_user_named("user_other", "grace")]);
    let users = repo.handle();
    let usecase = HandleIdentityEventUseCase { repo };

    usecase
        .execute(user_created("user_1", "grace@example.org", Some("Grace")))
        .await
        .unwrap();

    let users = users.lock().unwrap();
    let synced = users.iter().find(|u| u.external_id == "user_1").unwrap();
    assert_eq!(synced.username, None);
}

#[tokio::test]
async fn should_not_adopt_reserved_username() {
    let repo = MockUserRepo::empty();
    let users = repo.handle();
    let usecase = HandleIdentityEventUseCase { repo };
    usecase
        .execute(user_created("user_1", "root@example.org", Some("admin")))
        .await
        .unwrap();
    assert_eq!(users.lock().unwrap()[0].username, None);
}

#[tokio::test]
async fn should_delete_known_and_unknown_users() {
    let repo = MockUserRepo::empty();
    let users = repo.handle();
    let usecase = HandleIdentityEventUseCase { repo };
    usecase
        .execute(user_created("user_1", "grace@example.org", None))
        .await
        .unwrap();

    let deleted = usecase
        .execute(event(json!({"type": "user.deleted", "data": {"id": "user_1", "deleted": true}})))
        .await
        .unwrap();
    assert_eq!(deleted, WebhookOutcome::Deleted(true));
    assert!(users.lock().unwrap().is_empty());

    let unknown = usecase
        .execute(event(json!({"type": "user.deleted", "data": {"id": "user_404"}})))
        .await
        .unwrap();
    assert_eq!(unknown, WebhookOutcome::Deleted(false));
}

#[tokio::test]
async fn should_ignore_other_event_types() {
    let usecase = HandleIdentityEventUseCase {
        repo: MockUserRepo::empty(),
    };
    let outcome = usecase
        .execute(event(json!({"type": "session.created", "data": {"id": "sess_1"}})))
        .await
        .unwrap();
    assert_eq!(outcome, WebhookOutcome::Ignored);
}

#[tokio::test]
async fn should_reject_user_without_email() {
    let usecase = HandleIdentityEventUseCase {
        repo: MockUserRepo::empty(),
    };
    let result = usecase
        .execute(event(json!({
            "type": "user.created",
            "data": {"id": "user_1", "email_addresses": []}
        })))
        .await;
    assert!(matches!(result, Err(MembersServiceError::InvalidBody(_))));
}

#[tokio::test]
async fn should_surface_storage_failure_as_unavailable() {
    let usecase = HandleIdentityEventUseCase {
        repo: MockUserRepo::broken(),
    };
    let result = usecase
        .execute(user_created("user_1", "grace@example.org", None))
        .await;
    assert!(matches!(result, Err(MembersServiceError::Unavailable(_))));
}
