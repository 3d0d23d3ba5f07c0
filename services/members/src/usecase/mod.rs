pub mod avatar;
pub mod community;
pub mod profile;
pub mod recent_work;
pub mod webhook;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::MembersServiceError;

/// Resolve the session's external id to the local user.
///
/// Users appear once the identity webhook has synced them; until then the
/// caller is authenticated but unknown here.
pub(crate) async fn require_user<R: UserRepository>(
    repo: &R,
    external_id: &str,
) -> Result<User, MembersServiceError> {
    repo.find_by_external_id(external_id)
        .await?
        .ok_or(MembersServiceError::UserNotFound)
}
