use commons_members::domain::types::MAX_RECENT_WORKS;
use commons_members::error::MembersServiceError;
use commons_members::usecase::recent_work::{
    CreateRecentWorkUseCase, DeleteRecentWorkUseCase, ListRecentWorksUseCase, RecentWorkInput,
    RecentWorkPatch, UpdateRecentWorkUseCase,
};

use crate::helpers::{MockRecentWorkRepo, MockUserRepo, date, test_user};

fn input(title: &str) -> RecentWorkInput {
    RecentWorkInput {
        title: title.to_owned(),
        description: None,
        url: None,
        start_date: date(2025, 3, 1),
        end_date: Some(date(2025, 9, 30)),
        is_ongoing: false,
    }
}

// ── CreateRecentWork ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cap_recent_works_per_user() {
    let users = MockUserRepo::new(vec![test_user("user_a"), test_user("user_b")]);
    let works = MockRecentWorkRepo::empty();
    let usecase = CreateRecentWorkUseCase {
        users,
        recent_works: works.clone(),
    };

    for i in 0..MAX_RECENT_WORKS {
        usecase
            .execute("user_a", input(&format!("Project {i}")))
            .await
            .unwrap();
    }
    let sixth = usecase.execute("user_a", input("One too many")).await;
    assert!(matches!(
        sixth,
        Err(MembersServiceError::RecentWorkLimitReached)
    ));

    // The cap is per user.
    usecase.execute("user_b", input("Elsewhere")).await.unwrap();
    assert_eq!(works.handle().lock().unwrap().len(), MAX_RECENT_WORKS + 1);
}

#[tokio::test]
async fn should_reject_end_date_on_ongoing_work() {
    let usecase = CreateRecentWorkUseCase {
        users: MockUserRepo::new(vec![test_user("user_a")]),
        recent_works: MockRecentWorkRepo::empty(),
    };
    let result = usecase
        .execute(
            "user_a",
            RecentWorkInput {
                is_ongoing: true,
                ..input("Watershed survey")
            },
        )
        .await;

    let Err(MembersServiceError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    let error = errors.iter().next().unwrap();
    assert_eq!(error.field, "end_date");
    assert_eq!(error.code, "ongoing");
}

#[tokio::test]
async fn should_reject_end_before_start() {
    let usecase = CreateRecentWorkUseCase {
        users: MockUserRepo::new(vec![test_user("user_a")]),
        recent_works: MockRecentWorkRepo::empty(),
    };
    let result = usecase
        .execute(
            "user_a",
            RecentWorkInput {
                end_date: Some(date(2024, 1, 1)),
                ..input("Backwards")
            },
        )
        .await;
    assert!(matches!(result, Err(MembersServiceError::Validation(_))));
}

#[tokio::test]
async fn should_reject_blank_title_and_bad_url() {
    let usecase = CreateRecentWorkUseCase {
        users: MockUserRepo::new(vec![test_user("user_a")]),
        recent_works: MockRecentWorkRepo::empty(),
    };
    let result = usecase
        .execute(
            "user_a",
            RecentWorkInput {
                url: Some("nope".into()),
                ..input("   ")
            },
        )
        .await;

    let Err(MembersServiceError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["title", "url"]);
}

// ── ListRecentWorks ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_ongoing_first_then_latest_start() {
    let users = MockUserRepo::new(vec![test_user("user_a")]);
    let works = MockRecentWorkRepo::empty();
    let create = CreateRecentWorkUseCase {
        users: users.clone(),
        recent_works: works.clone(),
    };
    create
        .execute(
            "user_a",
            RecentWorkInput {
                start_date: date(2023, 1, 1),
                end_date: Some(date(2023, 6, 1)),
                ..input("Old")
            },
        )
        .await
        .unwrap();
    create
        .execute(
            "user_a",
            RecentWorkInput {
                start_date: date(2022, 1, 1),
                end_date: None,
                is_ongoing: true,
                ..input("Ongoing")
            },
        )
        .await
        .unwrap();
    create.execute("user_a", input("Recent")).await.unwrap();

    let list = ListRecentWorksUseCase {
        users,
        recent_works: works,
    };
    let titles: Vec<_> = list
        .execute("user_a")
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.title)
        .collect();
    assert_eq!(titles, vec!["Ongoing", "Recent", "Old"]);
}

// ── UpdateRecentWork / DeleteRecentWork ──────────────────────────────────────

#[tokio::test]
async fn should_patch_and_drop_end_date_when_marked_ongoing() {
    let users = MockUserRepo::new(vec![test_user("user_a")]);
    let works = MockRecentWorkRepo::empty();
    let created = CreateRecentWorkUseCase {
        users: users.clone(),
        recent_works: works.clone(),
    }
    .execute("user_a", input("Survey"))
    .await
    .unwrap();

    let updated = UpdateRecentWorkUseCase {
        users,
        recent_works: works,
    }
    .execute(
        "user_a",
        created.id,
        RecentWorkPatch {
            is_ongoing: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(updated.is_ongoing);
    assert_eq!(updated.end_date, None);
    assert_eq!(updated.title, "Survey");
}

#[tokio::test]
async fn should_hide_other_users_entries() {
    let users = MockUserRepo::new(vec![test_user("user_a"), test_user("user_b")]);
    let works = MockRecentWorkRepo::empty();
    let created = CreateRecentWorkUseCase {
        users: users.clone(),
        recent_works: works.clone(),
    }
    .execute("user_a", input("Mine"))
    .await
    .unwrap();

    let patch = UpdateRecentWorkUseCase {
        users: users.clone(),
        recent_works: works.clone(),
    }
    .execute(
        "user_b",
        created.id,
        RecentWorkPatch {
            title: Some("Stolen".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(patch, Err(MembersServiceError::RecentWorkNotFound)));

    let delete = DeleteRecentWorkUseCase {
        users: users.clone(),
        recent_works: works.clone(),
    };
    let result = delete.execute("user_b", created.id).await;
    assert!(matches!(result, Err(MembersServiceError::RecentWorkNotFound)));

    delete.execute("user_a", created.id).await.unwrap();
    assert!(works.handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_empty_patch() {
    let usecase = UpdateRecentWorkUseCase {
        users: MockUserRepo::new(vec![test_user("user_a")]),
        recent_works: MockRecentWorkRepo::empty(),
    };
    let result = usecase
        .execute("user_a", uuid::Uuid::now_v7(), RecentWorkPatch::default())
        .await;
    assert!(matches!(result, Err(MembersServiceError::MissingData)));
}
