use anyhow::Context as _;
use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;

use crate::domain::avatar::{
    AvatarError, AvatarFormat, AvatarKeys, MAX_AVATAR_BYTES, VARIANT_CONTENT_TYPE, render_variants,
};
use crate::domain::repository::{AvatarStore, UserRepository};
use crate::error::MembersServiceError;
use crate::usecase::require_user;

/// Public URLs of one avatar set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarUrls {
    pub original: String,
    pub large: String,
    pub small: String,
}

impl AvatarUrls {
    pub fn new<S: AvatarStore>(store: &S, keys: &AvatarKeys) -> Self {
        Self {
            original: store.public_url(&keys.original()),
            large: store.public_url(&keys.large()),
            small: store.public_url(&keys.small()),
        }
    }
}

/// Delete every object of an avatar set. Failures are logged, never returned.
pub async fn delete_avatar_objects<S: AvatarStore>(store: &S, keys: &AvatarKeys) {
    let keys = keys.all();
    let results = join_all(keys.iter().map(|key| store.delete(key))).await;
    for (key, result) in keys.iter().zip(results) {
        if let Err(e) = result {
            tracing::warn!(key = %key, error = %e, "failed to delete avatar object");
        }
    }
}

// ── UploadAvatar ─────────────────────────────────────────────────────────────

pub struct AvatarUpload {
    /// `Content-Type` declared by the client for the file part.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

pub struct UploadAvatarUseCase<R: UserRepository, S: AvatarStore> {
    pub repo: R,
    pub store: S,
}

impl<R: UserRepository, S: AvatarStore> UploadAvatarUseCase<R, S> {
    pub async fn execute(
        &self,
        external_id: &str,
        upload: AvatarUpload,
    ) -> Result<AvatarUrls, MembersServiceError> {
        let format = upload
            .content_type
            .as_deref()
            .and_then(AvatarFormat::from_mime)
            .ok_or(MembersServiceError::InvalidAvatarType)?;
        if upload.bytes.is_empty() {
            return Err(MembersServiceError::MissingData);
        }
        if upload.bytes.len() > MAX_AVATAR_BYTES {
            return Err(MembersServiceError::AvatarTooLarge);
        }

        let user = require_user(&self.repo, external_id).await?;

        let original = upload.bytes;
        let source = original.clone();
        let variants = tokio::task::spawn_blocking(move || render_variants(&source, format))
            .await
            .context("join avatar render task")?
            .map_err(|e| match e {
                AvatarError::TypeMismatch | AvatarError::Decode(_) => {
                    MembersServiceError::InvalidAvatarType
                }
                AvatarError::Encode(e) => {
                    MembersServiceError::Internal(anyhow::Error::new(e).context("encode avatar"))
                }
            })?;

        let keys = AvatarKeys::generate(user.id);
        let [original_key, large_key, small_key] = keys.all();
        let uploaded = tokio::try_join!(
            self.store.put(&original_key, original, format.content_type()),
            self.store
                .put(&large_key, Bytes::from(variants.large), VARIANT_CONTENT_TYPE),
            self.store
                .put(&small_key, Bytes::from(variants.small), VARIANT_CONTENT_TYPE),
        );
        if let Err(e) = uploaded {
            delete_avatar_objects(&self.store, &keys).await;
            return Err(e);
        }

        if let Err(e) = self.repo.set_avatar_key(user.id, Some(keys.prefix())).await {
            delete_avatar_objects(&self.store, &keys).await;
            return Err(e);
        }

        if let Some(previous) = user.avatar_key {
            delete_avatar_objects(&self.store, &AvatarKeys::from_prefix(previous)).await;
        }

        tracing::info!(user_id = %user.id, prefix = keys.prefix(), "avatar updated");
        Ok(AvatarUrls::new(&self.store, &keys))
    }
}

// ── DeleteAvatar ─────────────────────────────────────────────────────────────

pub struct DeleteAvatarUseCase<R: UserRepository, S: AvatarStore> {
    pub repo: R,
    pub store: S,
}

impl<R: UserRepository, S: AvatarStore> DeleteAvatarUseCase<R, S> {
    pub async fn execute(&self, external_id: &str) -> Result<(), MembersServiceError> {
        let user = require_user(&self.repo, external_id).await?;
        let Some(prefix) = user.avatar_key else {
            return Ok(());
        };
        self.repo.set_avatar_key(user.id, None).await?;
        delete_avatar_objects(&self.store, &AvatarKeys::from_prefix(prefix)).await;
        Ok(())
    }
}
