//! Raster normalization: everything embedded in the archive is PNG.

use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;
use tracing::debug;

use super::kind::ContentKind;
use crate::error::{Error, Result};

/// Upscale factor applied when rendering a PDF page.
pub const PDF_RENDER_SCALE: f32 = 2.0;

/// Renders the first page of a PDF document.
pub trait PdfRasterizer {
    fn first_page(&self, src: &str, data: &[u8]) -> Result<DynamicImage>;
}

/// [`PdfRasterizer`] backed by the pdfium library.
///
/// The library is bound on each call: first from the directory of the running
/// executable, then from the system library path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for the pdfium shared library in `dir` before the system path.
    pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    fn bind(&self) -> std::result::Result<Pdfium, PdfiumError> {
        let dir = self.library_dir.clone().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from))
        });
        let bindings = match dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
                .or_else(|_| Pdfium::bind_to_system_library())?,
            None => Pdfium::bind_to_system_library()?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    fn first_page(&self, src: &str, data: &[u8]) -> Result<DynamicImage> {
        let pdfium = self
            .bind()
            .map_err(|e| Error::decode(src, format!("pdfium unavailable: {e:?}")))?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| Error::decode(src, format!("{e:?}")))?;

        let pages = document.pages();
        if pages.len() == 0 {
            return Err(Error::decode(src, "document has no pages"));
        }
        let page = pages
            .get(0)
            .map_err(|e| Error::decode(src, format!("{e:?}")))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(PDF_RENDER_SCALE);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::decode(src, format!("{e:?}")))?;

        let image = bitmap.as_image();
        debug!(src, width = image.width(), height = image.height(), "rendered pdf page");
        Ok(image)
    }
}

/// Convert attachment bytes to PNG.
///
/// PNG input is passed through untouched. PDF input is rendered through
/// `rasterizer`; anything else goes through the generic image decoder, which
/// sniffs the actual format.
pub fn normalize_to_png(
    src: &str,
    kind: ContentKind,
    data: Vec<u8>,
    rasterizer: &dyn PdfRasterizer,
) -> Result<Vec<u8>> {
    let image = match kind {
        ContentKind::Png => return Ok(data),
        ContentKind::Pdf => rasterizer.first_page(src, &data)?,
        _ => image::load_from_memory(&data).map_err(|e| Error::decode(src, e))?,
    };
    encode_png(src, &image)
}

fn encode_png(src: &str, image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Error::decode(src, e))?;
    Ok(buf)
}
