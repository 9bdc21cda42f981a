mod card;
mod config;
mod errors;
mod layout;
mod render;
mod routes;
mod state;
mod upload;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, MeasureStrategy, RenderBackend, UploadBackend};
use crate::layout::{AverageCharWidth, GlyphMeasure, LineMeasure};
use crate::render::browserless::BrowserlessRenderer;
use crate::render::raster::{parse_font, read_font_file, RasterRenderer};
use crate::render::CardRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upload::freeimage::FreeimageUploader;
use crate::upload::s3::S3Uploader;
use crate::upload::ImageUploader;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting quotecard v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.http_timeout_secs);

    // Font bytes are required by the raster backend and glyph measurement only
    let font_data = match read_font_file(&config.font_path) {
        Ok(data) => {
            info!("Font loaded from {}", config.font_path.display());
            Some(data)
        }
        Err(e) => {
            warn!("{e}");
            None
        }
    };
    let needs_font = config.measure == MeasureStrategy::Glyph
        || config.render_backend == RenderBackend::Raster;
    let font = match (&font_data, needs_font) {
        (Some(data), true) => Some(parse_font(data.clone())?),
        (None, true) => anyhow::bail!(
            "FONT_PATH '{}' is required by the configured backends",
            config.font_path.display()
        ),
        (_, false) => None,
    };

    let measure: Arc<dyn LineMeasure> = match (config.measure, &font) {
        (MeasureStrategy::Glyph, Some(font)) => Arc::new(GlyphMeasure::new(font.clone())),
        _ => Arc::new(AverageCharWidth),
    };
    info!("Layout measure: {:?}", config.measure);

    let renderer: Arc<dyn CardRenderer> = match (&config.render_backend, font) {
        (RenderBackend::Browserless { url, token }, _) => Arc::new(
            BrowserlessRenderer::new(url, token, font_data.as_deref(), timeout)
                .context("Failed to build browserless client")?,
        ),
        (RenderBackend::Raster, Some(font)) => Arc::new(RasterRenderer::new(font)),
        (RenderBackend::Raster, None) => anyhow::bail!("raster renderer requires a font"),
    };
    info!("Renderer initialized: {}", renderer.name());

    let uploader: Arc<dyn ImageUploader> = match &config.upload_backend {
        UploadBackend::Freeimage { api_key } => Arc::new(
            FreeimageUploader::new(api_key.clone(), timeout)
                .context("Failed to build freeimage client")?,
        ),
        UploadBackend::S3(settings) => Arc::new(S3Uploader::from_settings(settings).await),
    };
    info!("Uploader initialized: {}", uploader.name());

    // Build app state
    let state = AppState {
        config: config.clone(),
        measure,
        renderer,
        uploader,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
