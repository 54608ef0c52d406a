//! Backend configuration from environment variables.

use std::env;

use thiserror::Error;

/// Default storage bucket for recipe images.
pub const DEFAULT_IMAGE_BUCKET: &str = "images";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. "https://abc123.supabase.co".
    pub base_url: String,
    /// Project API key sent with every request.
    pub api_key: String,
    /// Storage bucket holding recipe images.
    pub image_bucket: String,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `POTLUCK_BACKEND_URL`: project base URL
    /// - `POTLUCK_API_KEY`: project API key
    ///
    /// Optional:
    /// - `POTLUCK_IMAGE_BUCKET`: image bucket name (default: "images")
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("POTLUCK_BACKEND_URL")
            .map_err(|_| ConfigError::MissingEnvVar("POTLUCK_BACKEND_URL".to_string()))?;

        let api_key = env::var("POTLUCK_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("POTLUCK_API_KEY".to_string()))?;

        let image_bucket =
            env::var("POTLUCK_IMAGE_BUCKET").unwrap_or_else(|_| DEFAULT_IMAGE_BUCKET.to_string());

        Ok(Self {
            base_url,
            api_key,
            image_bucket,
        })
    }

    /// Build a config directly, normalizing a trailing slash off the URL.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: api_key.into(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
        }
    }

    pub fn image_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.image_bucket = bucket.into();
        self
    }
}
