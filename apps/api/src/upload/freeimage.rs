//! freeimage.host uploader.
//!
//! The API takes a multipart form (`key`, base64 `source`, `format=json`) and
//! answers with a JSON envelope whose `status_code` mirrors HTTP semantics.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::render::EncodedImage;
use crate::upload::{ImageUploader, UploadError};

pub const FREEIMAGE_UPLOAD_URL: &str = "https://freeimage.host/api/1/upload";

#[derive(Debug, Deserialize)]
struct FreeimageResponse {
    status_code: u16,
    #[serde(default)]
    status_txt: Option<String>,
    #[serde(default)]
    image: Option<FreeimageImage>,
    #[serde(default)]
    error: Option<FreeimageErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FreeimageImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct FreeimageErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct FreeimageUploader {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl FreeimageUploader {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, UploadError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint: FREEIMAGE_UPLOAD_URL.to_string(),
        })
    }
}

/// Extracts the hosted URL from a freeimage.host response body.
fn parse_upload_response(http_status: u16, body: &str) -> Result<String, UploadError> {
    let parsed: FreeimageResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&http_status) => {
            return Err(UploadError::Rejected {
                status: http_status,
                message: body.to_string(),
            })
        }
        Err(e) => return Err(UploadError::Parse(e)),
    };

    match parsed {
        FreeimageResponse {
            status_code: 200,
            image: Some(image),
            ..
        } => Ok(image.url),
        FreeimageResponse {
            status_code,
            status_txt,
            error,
            ..
        } => Err(UploadError::Rejected {
            status: status_code,
            message: error
                .map(|e| e.message)
                .or(status_txt)
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
    }
}

#[async_trait]
impl ImageUploader for FreeimageUploader {
    fn name(&self) -> &'static str {
        "freeimage"
    }

    async fn upload(&self, image: &EncodedImage) -> Result<String, UploadError> {
        let source = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let form = Form::new()
            .text("key", self.api_key.clone())
            .text("source", source)
            .text("format", "json");

        info!(bytes = image.bytes.len(), "Uploading card to freeimage.host");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_upload_response(status, &body).map_err(|e| {
            warn!("freeimage.host upload failed: {e}");
            e
        })
    }
}
