use std::sync::Arc;

use crate::config::Config;
use crate::layout::LineMeasure;
use crate::render::CardRenderer;
use crate::upload::ImageUploader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Width rule for wrapping and font-size search. Default: average char width.
    pub measure: Arc<dyn LineMeasure>,
    /// Pluggable rendering backend. Default: RasterRenderer. Swap via RENDER_BACKEND.
    pub renderer: Arc<dyn CardRenderer>,
    /// Pluggable image host. Default: FreeimageUploader. Swap via UPLOAD_BACKEND.
    pub uploader: Arc<dyn ImageUploader>,
}
