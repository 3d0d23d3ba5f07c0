use bytes::Bytes;

use commons_members::domain::avatar::{AvatarKeys, MAX_AVATAR_BYTES};
use commons_members::error::MembersServiceError;
use commons_members::usecase::avatar::{AvatarUpload, DeleteAvatarUseCase, UploadAvatarUseCase};

use crate::helpers::{MockAvatarStore, MockUserRepo, png_bytes, test_user};

fn upload(content_type: &str, bytes: Bytes) -> AvatarUpload {
    AvatarUpload {
        content_type: Some(content_type.to_owned()),
        bytes,
    }
}

// ── UploadAvatar ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_original_and_two_variants() {
    let repo = MockUserRepo::new(vec![test_user("user_a")]);
    let users = repo.handle();
    let store = MockAvatarStore::default();
    let usecase = UploadAvatarUseCase {
        repo,
        store: store.clone(),
    };

    let urls = usecase
        .execute("user_a", upload("image/png", png_bytes(500, 300)))
        .await
        .unwrap();

    let prefix = users.lock().unwrap()[0].avatar_key.clone().unwrap();
    let keys = AvatarKeys::from_prefix(prefix.clone());
    assert_eq!(store.keys().len(), 3);
    assert_eq!(urls.original, format!("https://cdn.test/{}", keys.original()));
    assert_eq!(urls.large, format!("https://cdn.test/{}", keys.large()));
    assert_eq!(urls.small, format!("https://cdn.test/{}", keys.small()));

    let objects = store.objects.lock().unwrap();
    assert_eq!(objects[&keys.original()].1, "image/png");
    assert_eq!(objects[&keys.large()].1, "image/jpeg");
}

#[tokio::test]
async fn should_remove_previous_avatar_after_replacing_it() {
    let repo = MockUserRepo::new(vec![test_user("user_a")]);
    let users = repo.handle();
    let store = MockAvatarStore::default();
    let usecase = UploadAvatarUseCase {
        repo,
        store: store.clone(),
    };

    usecase
        .execute("user_a", upload("image/png", png_bytes(64, 64)))
        .await
        .unwrap();
    let first = users.lock().unwrap()[0].avatar_key.clone().unwrap();

    usecase
        .execute("user_a", upload("image/png", png_bytes(64, 64)))
        .await
        .unwrap();
    let second = users.lock().unwrap()[0].avatar_key.clone().unwrap();

    assert_ne!(first, second);
    let keys = store.keys();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|k| k.starts_with(&second)));
}

#[tokio::test]
async fn should_reject_disallowed_mime_type() {
    let usecase = UploadAvatarUseCase {
        repo: MockUserRepo::new(vec![test_user("user_a")]),
        store: MockAvatarStore::default(),
    };
    let result = usecase
        .execute("user_a", upload("image/gif", Bytes::from_static(b"GIF89a")))
        .await;
    assert!(matches!(result, Err(MembersServiceError::InvalidAvatarType)));
}

#[tokio::test]
async fn should_reject_content_that_does_not_match_declared_type() {
    let store = MockAvatarStore::default();
    let usecase = UploadAvatarUseCase {
        repo: MockUserRepo::new(vec![test_user("user_a")]),
        store: store.clone(),
    };
    let result = usecase
        .execute("user_a", upload("image/jpeg", png_bytes(32, 32)))
        .await;
    assert!(matches!(result, Err(MembersServiceError::InvalidAvatarType)));
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn should_reject_oversized_file() {
    let usecase = UploadAvatarUseCase {
        repo: MockUserRepo::new(vec![test_user("user_a")]),
        store: MockAvatarStore::default(),
    };
    let oversized = Bytes::from(vec![0u8; MAX_AVATAR_BYTES + 1]);
    let result = usecase
        .execute("user_a", upload("image/png", oversized))
        .await;
    assert!(matches!(result, Err(MembersServiceError::AvatarTooLarge)));
}

#[tokio::test]
async fn should_reject_empty_file() {
    let usecase = UploadAvatarUseCase {
        repo: MockUserRepo::new(vec![test_user("user_a")]),
        store: MockAvatarStore::default(),
    };
    let result = usecase
        .execute("user_a", upload("image/png", Bytes::new()))
        .await;
    assert!(matches!(result, Err(MembersServiceError::MissingData)));
}

#[tokio::test]
async fn should_clean_up_and_keep_old_key_when_an_upload_fails() {
    let repo = MockUserRepo::new(vec![test_user("user_a")]);
    let users = repo.handle();
    let store = MockAvatarStore::failing_on("/small.jpg");
    let usecase = UploadAvatarUseCase {
        repo,
        store: store.clone(),
    };

    let result = usecase
        .execute("user_a", upload("image/png", png_bytes(64, 64)))
        .await;

    assert!(matches!(result, Err(MembersServiceError::Unavailable(_))));
    assert!(store.keys().is_empty());
    assert_eq!(users.lock().unwrap()[0].avatar_key, None);
}

// ── DeleteAvatar ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_clear_avatar_and_delete_objects() {
    let repo = MockUserRepo::new(vec![test_user("user_a")]);
    let users = repo.handle();
    let store = MockAvatarStore::default();
    UploadAvatarUseCase {
        repo: repo.clone(),
        store: store.clone(),
    }
    .execute("user_a", upload("image/png", png_bytes(64, 64)))
    .await
    .unwrap();

    DeleteAvatarUseCase {
        repo,
        store: store.clone(),
    }
    .execute("user_a")
    .await
    .unwrap();

    assert_eq!(users.lock().unwrap()[0].avatar_key, None);
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn should_succeed_when_no_avatar_is_set() {
    let usecase = DeleteAvatarUseCase {
        repo: MockUserRepo::new(vec![test_user("user_a")]),
        store: MockAvatarStore::default(),
    };
    usecase.execute("user_a").await.unwrap();
}
