use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable required by the selected backends is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub font_path: PathBuf,
    pub measure: MeasureStrategy,
    pub render_backend: RenderBackend,
    pub upload_backend: UploadBackend,
    pub http_timeout_secs: u64,
}

/// Width rule used by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureStrategy {
    /// `font_size × 0.6` per character. Backend-independent.
    Estimate,
    /// Real advance widths from the font at `FONT_PATH`.
    Glyph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBackend {
    Raster,
    Browserless { url: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBackend {
    Freeimage { api_key: String },
    S3(S3Settings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub public_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let measure = match or_default("LAYOUT_MEASURE", "estimate").as_str() {
            "estimate" => MeasureStrategy::Estimate,
            "glyph" => MeasureStrategy::Glyph,
            other => bail!("LAYOUT_MEASURE must be 'estimate' or 'glyph', got '{other}'"),
        };

        let render_backend = match or_default("RENDER_BACKEND", "raster").as_str() {
            "raster" => RenderBackend::Raster,
            "browserless" => RenderBackend::Browserless {
                url: require("BROWSERLESS_URL")?,
                token: require("BROWSERLESS_TOKEN")?,
            },
            other => bail!("RENDER_BACKEND must be 'raster' or 'browserless', got '{other}'"),
        };

        let upload_backend = match or_default("UPLOAD_BACKEND", "freeimage").as_str() {
            "freeimage" => UploadBackend::Freeimage {
                api_key: require("FREEIMAGE_API_KEY")?,
            },
            "s3" => UploadBackend::S3(S3Settings {
                bucket: require("S3_BUCKET")?,
                endpoint: require("S3_ENDPOINT")?,
                public_url: require("S3_PUBLIC_URL")?,
                region: or_default("S3_REGION", "us-east-1"),
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            }),
            other => bail!("UPLOAD_BACKEND must be 'freeimage' or 's3', got '{other}'"),
        };

        Ok(Config {
            port: or_default("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
            font_path: PathBuf::from(or_default("FONT_PATH", "SFThonburi-Bold.ttf")),
            measure,
            render_backend,
            upload_backend,
            http_timeout_secs: or_default("HTTP_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_only_freeimage_key() {
        let config = config_from(&[("FREEIMAGE_API_KEY", "k")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.font_path, PathBuf::from("SFThonburi-Bold.ttf"));
        assert_eq!(config.measure, MeasureStrategy::Estimate);
        assert_eq!(config.render_backend, RenderBackend::Raster);
        assert_eq!(
            config.upload_backend,
            UploadBackend::Freeimage {
                api_key: "k".to_string()
            }
        );
        assert_eq!(config.http_timeout_secs, 60);
    }

    #[test]
    fn test_missing_freeimage_key_is_an_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("FREEIMAGE_API_KEY"));
    }

    #[test]
    fn test_browserless_requires_url_and_token() {
        let err = config_from(&[
            ("FREEIMAGE_API_KEY", "k"),
            ("RENDER_BACKEND", "browserless"),
            ("BROWSERLESS_URL", "wss://chrome.example.com"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("BROWSERLESS_TOKEN"));

        let config = config_from(&[
            ("FREEIMAGE_API_KEY", "k"),
            ("RENDER_BACKEND", "browserless"),
            ("BROWSERLESS_URL", "wss://chrome.example.com"),
            ("BROWSERLESS_TOKEN", "t"),
        ])
        .unwrap();
        assert!(matches!(config.render_backend, RenderBackend::Browserless { .. }));
    }

    #[test]
    fn test_s3_backend_settings() {
        let config = config_from(&[
            ("UPLOAD_BACKEND", "s3"),
            ("S3_BUCKET", "cards"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("S3_PUBLIC_URL", "http://localhost:9000/cards"),
            ("AWS_ACCESS_KEY_ID", "minio"),
            ("AWS_SECRET_ACCESS_KEY", "minio123"),
        ])
        .unwrap();
        match config.upload_backend {
            UploadBackend::S3(settings) => {
                assert_eq!(settings.bucket, "cards");
                assert_eq!(settings.region, "us-east-1");
            }
            other => panic!("expected S3 backend, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_backend_names_are_rejected() {
        let err =
            config_from(&[("FREEIMAGE_API_KEY", "k"), ("RENDER_BACKEND", "gpu")]).unwrap_err();
        assert!(err.to_string().contains("RENDER_BACKEND"));
        let err =
            config_from(&[("FREEIMAGE_API_KEY", "k"), ("LAYOUT_MEASURE", "exact")]).unwrap_err();
        assert!(err.to_string().contains("LAYOUT_MEASURE"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("FREEIMAGE_API_KEY", "k"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
