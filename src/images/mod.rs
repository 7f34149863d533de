//! Figure attachment pipeline.
//!
//! Figures reference external assets by a source string. The pipeline fetches
//! each distinct source once per conversion, normalizes it to PNG, embeds it
//! into the output archive and remembers the archive path.

mod client;
mod kind;
mod raster;

use std::collections::HashMap;

use tracing::debug;

use crate::book::Archive;
use crate::error::{Error, Result};

pub use client::{AttachmentClient, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT, HttpAttachmentClient};
pub use kind::{ContentKind, detect_content_kind, normalized_filename};
pub use raster::{PDF_RENDER_SCALE, PdfRasterizer, PdfiumRasterizer, normalize_to_png};

/// Default CSS `max-height` applied to embedded figures.
pub const DEFAULT_MAX_IMAGE_HEIGHT: &str = "80vh";

/// Per-conversion figure resolver.
///
/// Owns the source-to-archive-path cache; one instance serves exactly one
/// conversion.
pub struct ImagePipeline {
    client: Option<Box<dyn AttachmentClient>>,
    rasterizer: Box<dyn PdfRasterizer>,
    revision_id: String,
    max_image_height: String,
    cache: HashMap<String, String>,
}

impl ImagePipeline {
    /// Create a pipeline for one statute revision, without a fetch client.
    pub fn new(revision_id: impl Into<String>) -> Self {
        Self {
            client: None,
            rasterizer: Box::new(PdfiumRasterizer::new()),
            revision_id: revision_id.into(),
            max_image_height: DEFAULT_MAX_IMAGE_HEIGHT.to_string(),
            cache: HashMap::new(),
        }
    }

    pub fn with_client(mut self, client: impl AttachmentClient + 'static) -> Self {
        self.client = Some(Box::new(client));
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: impl PdfRasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    pub fn with_max_image_height(mut self, height: impl Into<String>) -> Self {
        self.max_image_height = height.into();
        self
    }

    pub fn revision_id(&self) -> &str {
        &self.revision_id
    }

    pub fn max_image_height(&self) -> &str {
        &self.max_image_height
    }

    /// Archive path of an already resolved source.
    pub fn cached(&self, src: &str) -> Option<&str> {
        self.cache.get(src).map(String::as_str)
    }

    /// Resolve a figure source to an archive path, embedding it on first use.
    ///
    /// Returns `Ok(None)` for an empty source. Fetch and decode failures are
    /// returned as figure-level errors; a missing client is a configuration
    /// error.
    pub fn resolve(&mut self, src: &str, archive: &mut dyn Archive) -> Result<Option<String>> {
        if src.is_empty() {
            return Ok(None);
        }
        if let Some(path) = self.cache.get(src) {
            debug!(src, path = %path, "figure cache hit");
            return Ok(Some(path.clone()));
        }

        let client = self.client.as_deref().ok_or_else(|| {
            Error::Configuration("image download enabled without an attachment client".into())
        })?;

        let data = client.fetch_attachment(&self.revision_id, src)?;
        let kind = detect_content_kind(src, &data);
        debug!(src, kind = kind.mime_type(), bytes = data.len(), "fetched attachment");

        let png = if kind.is_normalized() {
            data
        } else {
            normalize_to_png(src, kind, data, self.rasterizer.as_ref())?
        };

        let path = archive.add_raster_asset(png, &normalized_filename(src))?;
        self.cache.insert(src.to_string(), path.clone());
        Ok(Some(path))
    }
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline")
            .field("revision_id", &self.revision_id)
            .field("max_image_height", &self.max_image_height)
            .field("has_client", &self.client.is_some())
            .field("cached", &self.cache.len())
            .finish()
    }
}
