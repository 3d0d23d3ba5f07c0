use axum::{
    Router,
    routing::get,
};

use commons_core::health::{healthz, readyz};
use commons_core::middleware::with_http_layers;

use crate::handlers::{
    case_study::{get_case_study, list_case_studies, list_my_case_studies, submit_case_study},
    news::{get_news_post, list_news},
    page::get_page,
    resource::list_resources,
    taxonomy::{list_organizations, list_projects, list_tags},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        // Pages
        .route("/pages/{slug}", get(get_page))
        // Listings
        .route("/news", get(list_news))
        .route("/news/{slug}", get(get_news_post))
        .route(
            "/case-studies",
            get(list_case_studies).post(submit_case_study),
        )
        .route("/case-studies/{slug}", get(get_case_study))
        .route("/resources", get(list_resources))
        // Taxonomy
        .route("/tags", get(list_tags))
        .route("/organizations", get(list_organizations))
        .route("/projects", get(list_projects))
        // Submissions
        .route("/users/@me/case-studies", get(list_my_case_studies));

    with_http_layers(router).with_state(state)
}
