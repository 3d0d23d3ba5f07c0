use commons_content::error::ContentServiceError;
use commons_content::usecase::submission::{CaseStudySubmission, SubmitCaseStudyUseCase};
use commons_domain::locale::Locale;
use commons_domain::review::ReviewStatus;

use crate::helpers::{MockCms, test_tag};

fn submission() -> CaseStudySubmission {
    CaseStudySubmission {
        title: "Rainwater tanks in Recife".into(),
        summary: "How forty households started harvesting rain.".into(),
        body: Some("   ".into()),
        country: Some("br".into()),
        organization_name: Some("  Chuva Viva  ".into()),
        contact_email: "coord@chuva.example.org".into(),
        website: Some("https://chuva.example.org".into()),
        tags: vec!["tag-water".into(), "tag-water".into()],
    }
}

fn cms() -> MockCms {
    MockCms {
        tags: vec![test_tag("water"), test_tag("energy")],
        ..MockCms::new()
    }
}

#[tokio::test]
async fn should_write_submission_for_review_in_submitter_locale() {
    let repo = cms();
    let usecase = SubmitCaseStudyUseCase { repo: repo.clone() };
    let id = usecase
        .execute("user_author", Locale::Pt, submission())
        .await
        .unwrap();

    let created = repo.created();
    assert_eq!(created.len(), 1);
    let doc = &created[0];
    assert_eq!(doc.id, id);
    assert_eq!(doc.doc_type, "caseStudy");
    assert_eq!(doc.status, ReviewStatus::InReview);
    assert_eq!(doc.submitted_by, "user_author");
    assert_eq!(doc.submitted_locale, Locale::Pt);
    assert_eq!(doc.title.get(Locale::Pt), Some("Rainwater tanks in Recife"));
    assert_eq!(doc.title.get(Locale::En), None);
    assert!(
        doc.slug
            .get(Locale::Pt)
            .unwrap()
            .starts_with("rainwater-tanks-in-recife-")
    );
    assert!(doc.body.is_empty());
    assert_eq!(doc.country.as_deref(), Some("BR"));
    assert_eq!(doc.organization_name.as_deref(), Some("Chuva Viva"));
    assert_eq!(doc.tags.len(), 1);
    assert_eq!(doc.tags[0].id, "tag-water");
}

#[tokio::test]
async fn should_report_every_invalid_field() {
    let repo = cms();
    let usecase = SubmitCaseStudyUseCase { repo: repo.clone() };
    let input = CaseStudySubmission {
        title: "Tiny".into(),
        summary: "Too short".into(),
        country: Some("BRA".into()),
        contact_email: "not-an-email".into(),
        website: Some("chuva".into()),
        ..submission()
    };

    let Err(ContentServiceError::Validation(errors)) =
        usecase.execute("user_author", Locale::En, input).await
    else {
        panic!("expected validation failure");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["contact_email", "country", "summary", "title", "website"]
    );
    assert!(repo.created().is_empty());
}

#[tokio::test]
async fn should_apply_length_rules_to_trimmed_text() {
    let repo = cms();
    let usecase = SubmitCaseStudyUseCase { repo: repo.clone() };
    let input = CaseStudySubmission {
        title: format!("   ab{}", " ".repeat(10)),
        summary: format!("{}short{}", " ".repeat(20), " ".repeat(20)),
        ..submission()
    };

    let Err(ContentServiceError::Validation(errors)) =
        usecase.execute("user_author", Locale::En, input).await
    else {
        panic!("expected validation failure");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["summary", "title"]);
    assert!(repo.created().is_empty());
}

#[tokio::test]
async fn should_treat_blank_optional_fields_as_absent() {
    let repo = cms();
    let usecase = SubmitCaseStudyUseCase { repo: repo.clone() };
    let input = CaseStudySubmission {
        website: Some(String::new()),
        country: Some("  ".into()),
        organization_name: Some(" ".into()),
        ..submission()
    };

    usecase
        .execute("user_author", Locale::En, input)
        .await
        .unwrap();

    let created = repo.created();
    assert_eq!(created[0].website, None);
    assert_eq!(created[0].country, None);
    assert_eq!(created[0].organization_name, None);
}

#[tokio::test]
async fn should_limit_tag_count() {
    let usecase = SubmitCaseStudyUseCase { repo: cms() };
    let input = CaseStudySubmission {
        tags: (0..11).map(|i| format!("tag-{i}")).collect(),
        ..submission()
    };
    let Err(ContentServiceError::Validation(errors)) =
        usecase.execute("user_author", Locale::En, input).await
    else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.iter().next().unwrap().field, "tags");
}

#[tokio::test]
async fn should_reject_unknown_tag_ids() {
    let repo = cms();
    let usecase = SubmitCaseStudyUseCase { repo: repo.clone() };
    let input = CaseStudySubmission {
        tags: vec!["tag-energy".into(), "tag-mining".into()],
        ..submission()
    };
    let Err(ContentServiceError::Validation(errors)) =
        usecase.execute("user_author", Locale::En, input).await
    else {
        panic!("expected validation failure");
    };
    let error = errors.iter().next().unwrap();
    assert_eq!(error.field, "tags[1]");
    assert_eq!(error.code, "unknown_tag");
    assert!(repo.created().is_empty());
}

#[tokio::test]
async fn should_surface_cms_write_failure_as_unavailable() {
    let usecase = SubmitCaseStudyUseCase {
        repo: MockCms {
            fail_writes: true,
            ..cms()
        },
    };
    let result = usecase.execute("user_author", Locale::En, submission()).await;
    assert!(matches!(result, Err(ContentServiceError::Unavailable(_))));
}
