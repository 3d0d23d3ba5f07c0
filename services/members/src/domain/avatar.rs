//! Avatar image handling: format checks, fixed-size variants and object keys.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use uuid::Uuid;

/// Largest accepted upload, in bytes (5 MiB).
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
pub const LARGE_SIZE_PX: u32 = 400;
pub const SMALL_SIZE_PX: u32 = 96;
pub const JPEG_QUALITY: u8 = 85;
pub const VARIANT_CONTENT_TYPE: &str = "image/jpeg";

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarFormat {
    Jpeg,
    Png,
    Webp,
}

impl AvatarFormat {
    /// Parse a declared MIME type. Parameters (`; charset=...`) are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect the real format from the file's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("declared type does not match file contents")]
    TypeMismatch,
    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("cannot encode variant: {0}")]
    Encode(#[source] image::ImageError),
}

/// Resized JPEG renditions of an upload.
#[derive(Debug, Clone)]
pub struct AvatarVariants {
    pub large: Vec<u8>,
    pub small: Vec<u8>,
}

/// Check that the bytes really are `declared` and produce both variants.
///
/// CPU-bound; run on a blocking thread.
pub fn render_variants(bytes: &[u8], declared: AvatarFormat) -> Result<AvatarVariants, AvatarError> {
    if AvatarFormat::sniff(bytes) != Some(declared) {
        return Err(AvatarError::TypeMismatch);
    }
    let image = image::load_from_memory_with_format(bytes, declared.image_format())
        .map_err(AvatarError::Decode)?;
    Ok(AvatarVariants {
        large: square_jpeg(&image, LARGE_SIZE_PX)?,
        small: square_jpeg(&image, SMALL_SIZE_PX)?,
    })
}

/// Centre-crop to a square and scale to `size`×`size`.
fn square_jpeg(image: &DynamicImage, size: u32) -> Result<Vec<u8>, AvatarError> {
    // JPEG has no alpha channel.
    let resized = DynamicImage::ImageRgb8(
        image
            .resize_to_fill(size, size, FilterType::Lanczos3)
            .to_rgb8(),
    );
    let mut buf = Cursor::new(Vec::new());
    resized
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))
        .map_err(AvatarError::Encode)?;
    Ok(buf.into_inner())
}

/// Object keys of one avatar set. Only the prefix is stored on the user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarKeys {
    prefix: String,
}

impl AvatarKeys {
    /// Fresh versioned prefix, so new uploads never overwrite cached objects.
    pub fn generate(user_id: Uuid) -> Self {
        Self {
            prefix: format!("avatars/{user_id}/{}", Uuid::now_v7().simple()),
        }
    }

    pub fn from_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn original(&self) -> String {
        format!("{}/original", self.prefix)
    }

    pub fn large(&self) -> String {
        format!("{}/large.jpg", self.prefix)
    }

    pub fn small(&self) -> String {
        format!("{}/small.jpg", self.prefix)
    }

    pub fn all(&self) -> [String; 3] {
        [self.original(), self.large(), self.small()]
    }
}
