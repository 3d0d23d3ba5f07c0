use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

use commons_core::health::{healthz, readyz};
use commons_core::middleware::with_http_layers;

use crate::domain::avatar::MAX_AVATAR_BYTES;
use crate::handlers::{
    avatar::{delete_avatar, upload_avatar},
    community::{
        create_community, get_community, join_community, leave_community, list_communities,
        list_community_members, list_my_communities,
    },
    profile::{check_username, delete_me, get_me, get_public_profile, update_me},
    recent_work::{create_recent_work, delete_recent_work, list_recent_works, update_recent_work},
    webhook::identity_webhook,
};
use crate::state::AppState;

/// Multipart framing around the avatar file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        // Profile
        .route("/users/@me", get(get_me).patch(update_me).delete(delete_me))
        .route("/users/{username}", get(get_public_profile))
        .route(
            "/usernames/{username}/availability",
            get(check_username),
        )
        // Avatar
        .route(
            "/users/@me/avatar",
            post(upload_avatar)
                .delete(delete_avatar)
                .layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + MULTIPART_OVERHEAD)),
        )
        // Recent works
        .route(
            "/users/@me/recent-works",
            get(list_recent_works).post(create_recent_work),
        )
        .route(
            "/users/@me/recent-works/{id}",
            patch(update_recent_work).delete(delete_recent_work),
        )
        // Communities
        .route("/users/@me/communities", get(list_my_communities))
        .route("/communities", get(list_communities).post(create_community))
        .route("/communities/{slug}", get(get_community))
        .route(
            "/communities/{slug}/members",
            get(list_community_members)
                .post(join_community)
                .delete(leave_community),
        )
        // Identity provider
        .route("/webhooks/identity", post(identity_webhook));

    with_http_layers(router).with_state(state)
}
