//! Remote headless-browser backend.
//!
//! Posts the HTML card page to a browserless `/screenshot` endpoint with the
//! viewport set to the canvas size and returns the screenshot bytes as-is.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::request::LayoutResult;
use crate::render::html::build_card_html;
use crate::render::{CardRenderer, CardStyle, EncodedImage, ImageFormat, RenderError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotRequest<'a> {
    html: &'a str,
    options: ScreenshotOptions,
    viewport: Viewport,
    goto_options: GotoOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotOptions {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<u8>,
    full_page: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Viewport {
    width: u32,
    height: u32,
    device_scale_factor: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
}

#[derive(Debug, Clone)]
pub struct BrowserlessRenderer {
    client: Client,
    screenshot_url: Url,
    font_base64: Option<String>,
}

impl BrowserlessRenderer {
    /// `font_data` is embedded into every page; pass `None` to use the browser's fonts.
    pub fn new(
        base_url: &str,
        token: &str,
        font_data: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<Self, RenderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            screenshot_url: screenshot_url(base_url, token)?,
            font_base64: font_data.map(|d| base64::engine::general_purpose::STANDARD.encode(d)),
        })
    }
}

/// Builds the REST screenshot URL. Websocket endpoints (`wss://`, `ws://`) are
/// accepted and mapped to their HTTP equivalents. The token is percent-encoded.
pub fn screenshot_url(base_url: &str, token: &str) -> Result<Url, RenderError> {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = base.strip_prefix("ws://") {
        format!("http://{rest}")
    } else {
        base.to_string()
    };
    let mut url = Url::parse(&format!("{base}/screenshot"))
        .map_err(|e| RenderError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

fn screenshot_options(style: &CardStyle) -> ScreenshotOptions {
    let (kind, quality) = match style.format {
        ImageFormat::Webp => ("webp", Some(style.quality)),
        ImageFormat::Jpeg => ("jpeg", Some(style.quality)),
        ImageFormat::Png => ("png", None),
    };
    ScreenshotOptions {
        kind,
        quality,
        full_page: false,
    }
}

#[async_trait]
impl CardRenderer for BrowserlessRenderer {
    fn name(&self) -> &'static str {
        "browserless"
    }

    async fn render(
        &self,
        layout: &LayoutResult,
        style: &CardStyle,
    ) -> Result<EncodedImage, RenderError> {
        let html = build_card_html(layout, style, self.font_base64.as_deref());
        let body = ScreenshotRequest {
            html: &html,
            options: screenshot_options(style),
            viewport: Viewport {
                width: style.width,
                height: style.height,
                device_scale_factor: 1,
            },
            goto_options: GotoOptions {
                wait_until: "networkidle0",
            },
        };

        debug!(html_bytes = html.len(), "Sending card page to browserless");

        let response = self
            .client
            .post(self.screenshot_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Browserless returned {}: {}", status, message);
            return Err(RenderError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(EncodedImage {
            bytes,
            format: style.format,
            width: style.width,
            height: style.height,
        })
    }
}
