use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::domain::repository::AvatarStore;
use crate::error::MembersServiceError;

/// Keys are versioned, so objects never change once written.
const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Avatar objects in an S3-compatible bucket served from a public base URL.
#[derive(Clone)]
pub struct S3AvatarStore {
    pub client: aws_sdk_s3::Client,
    pub bucket: String,
    pub public_base_url: String,
}

impl S3AvatarStore {
    /// Client from the default AWS credential chain. A custom endpoint
    /// (MinIO, R2, ...) switches to path-style addressing.
    pub async fn connect(
        bucket: String,
        public_base_url: String,
        endpoint_url: Option<&str>,
    ) -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket,
            public_base_url,
        }
    }
}

impl AvatarStore for S3AvatarStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), MembersServiceError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .cache_control(CACHE_CONTROL)
            .send()
            .await
            .map_err(|e| {
                MembersServiceError::Unavailable(anyhow::anyhow!(
                    "put object {key}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), MembersServiceError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                MembersServiceError::Unavailable(anyhow::anyhow!(
                    "delete object {key}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url.trim_end_matches('/'))
    }
}
