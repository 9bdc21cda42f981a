//! Axum route handlers for the card API.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::card::{layout_card, publish_card, render_card};
use crate::errors::AppError;
use crate::layout::{LayoutRequest, LayoutResult, Placement};
use crate::render::{CardStyle, ImageFormat, DEFAULT_QUALITY, MAX_CANVAS_PX};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Query parameters shared by `/`, `/layout` and `/image`.
///
/// `autoSize` defaults to `true` unless an explicit `fontSize` is given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    pub text: Option<String>,
    pub font_size: Option<u32>,
    pub auto_size: Option<bool>,
    pub quality: Option<u8>,
    pub max_width: Option<u32>,
    pub line_height: Option<f32>,
    pub max_lines: Option<usize>,
    pub min_font_size: Option<u32>,
    pub max_font_size: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<ImageFormat>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardResponse {
    pub success: bool,
    pub text: String,
    pub image_url: String,
    pub font_size: u32,
    pub lines: Vec<String>,
}

/// Layout plus line boxes. `placement` comes from the configured renderer, so
/// `x` and `width` match the rendered card rather than the wrapping estimate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreviewResponse {
    #[serde(flatten)]
    pub layout: LayoutResult,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub placement: Placement,
}

/// `|` in query text marks a line break; the wrapper treats it as a word boundary.
pub fn normalize_text(raw: &str) -> String {
    raw.replace('|', "\n")
}

impl CardQuery {
    /// Validates the query and splits it into layout constraints and canvas style.
    pub fn into_parts(self) -> Result<(LayoutRequest, CardStyle), AppError> {
        let text = self
            .text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Validation(
                    "text parameter is required, e.g. /?text=hello|world".to_string(),
                )
            })?;

        let defaults = CardStyle::default();
        let width = self.width.unwrap_or(defaults.width);
        let height = self.height.unwrap_or(defaults.height);
        for (name, value) in [("width", width), ("height", height)] {
            if value == 0 || value > MAX_CANVAS_PX {
                return Err(AppError::Validation(format!(
                    "{name} must be between 1 and {MAX_CANVAS_PX}, got {value}"
                )));
            }
        }

        let quality = self.quality.unwrap_or(DEFAULT_QUALITY);
        if !(1..=100).contains(&quality) {
            return Err(AppError::Validation(format!(
                "quality must be between 1 and 100, got {quality}"
            )));
        }

        let mut builder = LayoutRequest::builder(normalize_text(&text))
            .auto_size(self.auto_size.unwrap_or(self.font_size.is_none()))
            .font_size_px(self.font_size);
        if let Some(value) = self.max_width {
            builder = builder.max_width_px(value);
        }
        if let Some(value) = self.line_height {
            builder = builder.line_height_factor(value);
        }
        if let Some(value) = self.max_lines {
            builder = builder.max_lines(value);
        }
        if let Some(value) = self.min_font_size {
            builder = builder.min_font_size_px(value);
        }
        if let Some(value) = self.max_font_size {
            builder = builder.max_font_size_px(value);
        }
        let request = builder.build()?;

        let style = CardStyle {
            width,
            height,
            line_height_factor: request.line_height_factor(),
            format: self.format.unwrap_or_default(),
            quality,
            ..defaults
        };

        Ok((request, style))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Full pipeline: layout → render → upload. Returns the hosted image URL.
pub async fn handle_create_card(
    State(state): State<AppState>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Json<CreateCardResponse>, AppError> {
    let Query(query) = query?;
    let (request, style) = query.into_parts()?;
    let text = request.text().to_string();
    info!("Card requested: {text:?}");

    let card = publish_card(&state, request, &style).await?;

    Ok(Json(CreateCardResponse {
        success: true,
        text,
        image_url: card.image_url,
        font_size: card.layout.font_size_px,
        lines: card.layout.lines,
    }))
}

/// GET /layout
///
/// Runs the layout engine and returns font size, lines and the renderer's line boxes.
pub async fn handle_layout(
    State(state): State<AppState>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Json<LayoutPreviewResponse>, AppError> {
    let Query(query) = query?;
    let (request, style) = query.into_parts()?;
    let layout = layout_card(state.measure.clone(), request).await?;
    let placement = state
        .renderer
        .placement(&layout, &style, state.measure.as_ref());

    Ok(Json(LayoutPreviewResponse {
        layout,
        canvas_width: style.width,
        canvas_height: style.height,
        placement,
    }))
}

/// GET /image
///
/// Renders the card and returns the encoded bytes directly, without uploading.
pub async fn handle_image(
    State(state): State<AppState>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let (request, style) = query.into_parts()?;
    let card = render_card(&state, request, &style).await?;

    let headers = [
        (header::CONTENT_TYPE, card.image.format.mime_type().to_string()),
        (
            HeaderName::from_static("x-card-font-size"),
            card.layout.font_size_px.to_string(),
        ),
    ];
    Ok((headers, card.image.bytes).into_response())
}

/// GET /info
pub async fn handle_info(State(state): State<AppState>) -> Json<Value> {
    let port = state.config.port;
    Json(json!({
        "message": "Quote card image generator",
        "renderer": state.renderer.name(),
        "uploader": state.uploader.name(),
        "usage": "GET /?text=...&fontSize=100&quality=90&maxWidth=700&lineHeight=1.2",
        "endpoints": {
            "/": "render and upload, returns imageUrl",
            "/layout": "layout only, returns font size, lines and placement",
            "/image": "render only, returns the image bytes"
        },
        "example": format!("http://localhost:{port}/?text=hello%20world|new%20line")
    }))
}
