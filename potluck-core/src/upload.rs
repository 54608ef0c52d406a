//! Recipe image upload.
//!
//! Reads the picked file, validates it is actually an image we accept,
//! writes it to object storage under a collision-resistant name, and
//! resolves the public URL. An upload whose bytes land but whose URL cannot
//! be resolved is a failure like any other; callers never see a partial
//! success. Retries are the caller's decision, not this module's.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use image::{ImageFormat, ImageReader};
use thiserror::Error;

use crate::backend::{ObjectStore, StorageError};

/// Allowed image formats for recipe photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum file size for images (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No image attached to the draft")]
    MissingSource,

    #[error("Failed to read image {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image too large: {size} bytes (max {MAX_FILE_SIZE})")]
    TooLarge { size: usize },

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Failed to upload the image: {0}")]
    StorageWrite(StorageError),

    #[error("Failed to resolve the image's public URL: {0}")]
    UrlResolution(StorageError),
}

/// Uploads recipe images to one bucket of an [`ObjectStore`].
pub struct ImageUploader<S> {
    store: S,
    bucket: String,
}

impl<S: ObjectStore> ImageUploader<S> {
    pub fn new(store: S, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upload the image at `source` and return its public URL.
    ///
    /// `title` feeds the object name; repeated submissions with the same
    /// title get distinct names because the name also carries the upload
    /// timestamp.
    pub async fn upload(&self, source: Option<&Path>, title: &str) -> Result<String, UploadError> {
        let path = source.ok_or(UploadError::MissingSource)?;

        let data = tokio::fs::read(path).await.map_err(|source| UploadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        if data.len() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge { size: data.len() });
        }

        let format = detect_format(&data)?;
        let content_type = format.to_mime_type();
        let name = object_name(title, format, Utc::now());

        tracing::debug!(name = %name, content_type, size = data.len(), "uploading recipe image");

        self.store
            .put(&self.bucket, &name, data, content_type)
            .await
            .map_err(UploadError::StorageWrite)?;

        self.store
            .public_url(&self.bucket, &name)
            .await
            .map_err(UploadError::UrlResolution)
    }
}

/// Detect the image format from the file's bytes (never its extension) and
/// check it against the allow-list.
fn detect_format(data: &[u8]) -> Result<ImageFormat, UploadError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| UploadError::UnsupportedImage(format!("Failed to read image: {}", e)))?;

    let format = reader
        .format()
        .ok_or_else(|| UploadError::UnsupportedImage("Could not detect image format".to_string()))?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(UploadError::UnsupportedImage(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        )));
    }

    Ok(format)
}

/// Build the destination object name: upload timestamp plus a sanitized form
/// of the recipe title, with the extension matching the detected format.
fn object_name(title: &str, format: ImageFormat, at: DateTime<Utc>) -> String {
    let extension = format.extensions_str().first().copied().unwrap_or("bin");
    format!(
        "{}_{}.{}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        sanitize_title(title),
        extension
    )
}

/// Replace every character outside `[A-Za-z0-9_-]` with an underscore.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
