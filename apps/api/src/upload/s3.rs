//! S3 / MinIO uploader. Cards are stored under `cards/<date>/<uuid>.<ext>` and
//! served from a configured public base URL (bucket website, CDN, or MinIO).

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::S3Settings;
use crate::render::{EncodedImage, ImageFormat};
use crate::upload::{ImageUploader, UploadError};

#[derive(Clone)]
pub struct S3Uploader {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Uploader {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn from_settings(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "quotecard-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&settings.endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: settings.bucket.clone(),
            public_base_url: settings.public_url.clone(),
        }
    }
}

pub fn object_key(format: ImageFormat, date: NaiveDate, id: Uuid) -> String {
    format!(
        "cards/{}/{}.{}",
        date.format("%Y-%m-%d"),
        id,
        format.extension()
    )
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

#[async_trait]
impl ImageUploader for S3Uploader {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn upload(&self, image: &EncodedImage) -> Result<String, UploadError> {
        let key = object_key(image.format, Utc::now().date_naive(), Uuid::new_v4());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.bytes.to_vec()))
            .content_type(image.format.mime_type())
            .send()
            .await
            .map_err(|e| UploadError::S3(e.to_string()))?;

        info!("Uploaded card to s3://{}/{}", self.bucket, key);

        Ok(public_url(&self.public_base_url, &key))
    }
}
