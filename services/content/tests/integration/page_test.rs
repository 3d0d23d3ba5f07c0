use commons_content::domain::slug::SlugLookup;
use commons_content::domain::types::Block;
use commons_content::error::ContentServiceError;
use commons_content::usecase::news::GetNewsPostUseCase;
use commons_content::usecase::page::GetPageUseCase;
use commons_domain::locale::Locale;

use crate::helpers::{MockCms, test_news, test_page};

fn page_cms() -> MockCms {
    MockCms {
        pages: vec![test_page()],
        news: vec![test_news("river-cleanup", Some(2), &[])],
        ..MockCms::new()
    }
}

#[tokio::test]
async fn should_serve_page_for_matching_locale() {
    let usecase = GetPageUseCase { repo: page_cms() };
    let lookup = usecase.execute("sobre-nosotros", Locale::Es).await.unwrap();
    let SlugLookup::Found(page) = lookup else {
        panic!("expected the page to be served");
    };
    assert_eq!(page.id, "page-about");
    assert_eq!(page.title.resolve(Locale::Es), "Sobre nosotros");
    assert_eq!(page.blocks.len(), 3);
    assert_eq!(page.blocks[2], Block::Unsupported);
}

#[tokio::test]
async fn should_redirect_slug_of_another_locale() {
    let usecase = GetPageUseCase { repo: page_cms() };
    let lookup = usecase.execute("about-us", Locale::Es).await.unwrap();
    assert_eq!(lookup, SlugLookup::Redirect("sobre-nosotros".into()));
}

#[tokio::test]
async fn should_serve_page_when_locale_has_no_slug() {
    let usecase = GetPageUseCase { repo: page_cms() };
    let lookup = usecase.execute("about-us", Locale::Fr).await.unwrap();
    assert!(matches!(lookup, SlugLookup::Found(_)));
}

#[tokio::test]
async fn should_return_page_not_found() {
    let usecase = GetPageUseCase { repo: page_cms() };
    let result = usecase.execute("contact", Locale::En).await;
    assert!(matches!(result, Err(ContentServiceError::PageNotFound)));
}

#[tokio::test]
async fn should_resolve_news_slugs_across_locales() {
    let usecase = GetNewsPostUseCase { repo: page_cms() };
    let redirect = usecase.execute("river-cleanup-es", Locale::En).await.unwrap();
    assert_eq!(redirect, SlugLookup::Redirect("river-cleanup".into()));

    let missing = usecase.execute("nope", Locale::En).await;
    assert!(matches!(missing, Err(ContentServiceError::NewsPostNotFound)));
}
