pub mod avatar;
pub mod community;
pub mod profile;
pub mod recent_work;
pub mod webhook;

use axum::extract::FromRequest;

use crate::domain::avatar::AvatarKeys;
use crate::domain::repository::AvatarStore;
use crate::domain::types::User;
use crate::error::MembersServiceError;
use crate::usecase::avatar::AvatarUrls;

/// `axum::Json` whose rejection renders as `INVALID_BODY`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(MembersServiceError))]
pub struct JsonBody<T>(pub T);

pub(crate) fn avatar_urls<S: AvatarStore>(store: &S, user: &User) -> Option<AvatarUrls> {
    user.avatar_key
        .as_ref()
        .map(|prefix| AvatarUrls::new(store, &AvatarKeys::from_prefix(prefix.clone())))
}
