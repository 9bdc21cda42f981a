// Card pipeline: layout → render → upload.
// The layout engine is CPU-bound and runs inside tokio::task::spawn_blocking;
// rendering and upload go through the backends held in AppState.

pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::errors::AppError;
use crate::layout::{compute_layout, LayoutRequest, LayoutResult, LineMeasure};
use crate::render::{CardStyle, EncodedImage};
use crate::state::AppState;

/// A laid-out and encoded card, not yet published.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub layout: LayoutResult,
    pub image: EncodedImage,
}

/// A card that has been uploaded to the image host.
#[derive(Debug, Clone)]
pub struct PublishedCard {
    pub layout: LayoutResult,
    pub image_url: String,
}

/// Runs the layout engine off the async executor.
pub async fn layout_card(
    measure: Arc<dyn LineMeasure>,
    request: LayoutRequest,
) -> Result<LayoutResult, AppError> {
    tokio::task::spawn_blocking(move || compute_layout(measure.as_ref(), &request))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))
}

pub async fn render_card(
    state: &AppState,
    request: LayoutRequest,
    style: &CardStyle,
) -> Result<RenderedCard, AppError> {
    let layout = layout_card(state.measure.clone(), request).await?;

    let started = Instant::now();
    let image = state.renderer.render(&layout, style).await?;
    info!(
        renderer = state.renderer.name(),
        bytes = image.bytes.len(),
        width = image.width,
        height = image.height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Card rendered"
    );

    Ok(RenderedCard { layout, image })
}

pub async fn publish_card(
    state: &AppState,
    request: LayoutRequest,
    style: &CardStyle,
) -> Result<PublishedCard, AppError> {
    let RenderedCard { layout, image } = render_card(state, request, style).await?;

    let started = Instant::now();
    let image_url = state.uploader.upload(&image).await?;
    info!(
        uploader = state.uploader.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Card published: {image_url}"
    );

    Ok(PublishedCard { layout, image_url })
}
