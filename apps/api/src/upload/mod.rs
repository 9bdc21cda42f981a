//! Image hosting: pluggable uploaders that publish an encoded card and return
//! its public URL.
//!
//! Default: `FreeimageUploader` (freeimage.host API).
//! Alternative: `S3Uploader` (S3 / MinIO bucket behind a public base URL).
//!
//! `AppState` holds an `Arc<dyn ImageUploader>`, chosen at startup via config.

pub mod freeimage;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

use crate::render::EncodedImage;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected upload response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Short backend label, reported in responses and logs.
    fn name(&self) -> &'static str;

    /// Publishes the image and returns the URL it is served from.
    async fn upload(&self, image: &EncodedImage) -> Result<String, UploadError>;
}
