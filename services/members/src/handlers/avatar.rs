use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};

use commons_auth::identity::Session;

use crate::error::MembersServiceError;
use crate::state::AppState;
use crate::usecase::avatar::{AvatarUpload, AvatarUrls, DeleteAvatarUseCase, UploadAvatarUseCase};

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

fn multipart_error(e: MultipartError) -> MembersServiceError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MembersServiceError::AvatarTooLarge
    } else {
        MembersServiceError::InvalidBody(e.body_text())
    }
}

async fn read_file_field(multipart: &mut Multipart) -> Result<AvatarUpload, MembersServiceError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(AvatarUpload {
            content_type,
            bytes,
        });
    }
    Err(MembersServiceError::MissingData)
}

// ── POST /users/@me/avatar ───────────────────────────────────────────────────

pub async fn upload_avatar(
    session: Session,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AvatarUrls>, MembersServiceError> {
    let mut multipart = multipart.map_err(|e| MembersServiceError::InvalidBody(e.body_text()))?;
    let upload = read_file_field(&mut multipart).await?;
    let usecase = UploadAvatarUseCase {
        repo: state.user_repo(),
        store: state.avatar_store(),
    };
    let urls = usecase.execute(&session.external_id, upload).await?;
    Ok(Json(urls))
}

// ── DELETE /users/@me/avatar ─────────────────────────────────────────────────

pub async fn delete_avatar(
    session: Session,
    State(state): State<AppState>,
) -> Result<StatusCode, MembersServiceError> {
    let usecase = DeleteAvatarUseCase {
        repo: state.user_repo(),
        store: state.avatar_store(),
    };
    usecase.execute(&session.external_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
