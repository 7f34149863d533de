//! Document assembly: statute XML in, EPUB bytes out.
//!
//! This module ties the parser, the structural compiler and the package
//! writer together. It decides the package metadata, adds the title page and
//! stylesheet, and owns the one image pipeline a conversion uses.
//!
//! # Example
//!
//! ```no_run
//! use lawpub::convert::{ConvertOptions, ImageOptions, convert_file};
//!
//! let options = ConvertOptions::new()
//!     .with_images(ImageOptions::new("322AC0000000049_20240401_505AC0000000017"));
//! convert_file("law.xml", "law.epub", &options)?;
//! # Ok::<(), lawpub::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::book::{Archive, Metadata};
use crate::compile::compile_law;
use crate::epub::EpubBuilder;
use crate::error::{Error, Result};
use crate::images::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_IMAGE_HEIGHT, DEFAULT_TIMEOUT, HttpAttachmentClient,
    ImagePipeline, PdfiumRasterizer,
};
use crate::model::Law;
use crate::parse::parse_law;
use crate::render::text::{escape_html, render_text};
use crate::render::{RenderContext, STYLESHEET};
use crate::util::name_uuid;

const TITLE_PAGE_TITLE: &str = "タイトルページ";
const TITLE_PAGE_FILE: &str = "title.xhtml";

/// Figure download settings.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Statute revision the attachments belong to.
    pub revision_id: String,
    /// CSS `max-height` for embedded figures.
    pub max_image_height: String,
    pub api_base_url: String,
    pub timeout: Duration,
    /// Directory holding the pdfium shared library; `None` searches next to
    /// the executable, then the system path.
    pub pdfium_dir: Option<PathBuf>,
}

impl ImageOptions {
    pub fn new(revision_id: impl Into<String>) -> Self {
        Self {
            revision_id: revision_id.into(),
            max_image_height: DEFAULT_MAX_IMAGE_HEIGHT.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            pdfium_dir: None,
        }
    }

    pub fn with_max_image_height(mut self, height: impl Into<String>) -> Self {
        self.max_image_height = height.into();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pdfium_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdfium_dir = Some(dir.into());
        self
    }

    fn rasterizer(&self) -> PdfiumRasterizer {
        match &self.pdfium_dir {
            Some(dir) => PdfiumRasterizer::new().with_library_dir(dir.clone()),
            None => PdfiumRasterizer::new(),
        }
    }

    /// Pipeline with an HTTP client for these settings.
    pub fn pipeline(&self) -> Result<ImagePipeline> {
        let client = HttpAttachmentClient::new(&self.api_base_url, self.timeout)?;
        Ok(ImagePipeline::new(&self.revision_id)
            .with_client(client)
            .with_rasterizer(self.rasterizer())
            .with_max_image_height(&self.max_image_height))
    }
}

/// Conversion settings.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// `None` leaves every figure out of the package.
    pub images: Option<ImageOptions>,
    /// Deflate level for compressed entries (0-9).
    pub compression_level: Option<i64>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(mut self, images: ImageOptions) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }
}

/// Revision id encoded in a source filename (`lawID_date_revision.xml`).
///
/// Returns `None` when the stem has fewer than two `_` separators.
pub fn revision_id_from_path(path: impl AsRef<Path>) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    if stem.matches('_').count() >= 2 {
        Some(stem.to_string())
    } else {
        None
    }
}

/// Package metadata derived from the statute header.
pub fn law_metadata(law: &Law) -> Metadata {
    let title = law.title();
    let description = format!(
        "公布日: {}\n法令番号: {}\n現行法令名: {} {}",
        law.promulgation.display(" "),
        law.law_num,
        render_text(title),
        law.body.kana
    );
    let identifier = format!(
        "urn:uuid:{}",
        name_uuid(format!("{}\n{}", law.law_num, title.as_str()).as_bytes())
    );

    let mut metadata = Metadata::new(title.as_str())
        .with_author(&law.law_num)
        .with_language(&law.lang)
        .with_identifier(identifier)
        .with_description(description);
    if let Some(date) = law.promulgation.iso_date() {
        metadata = metadata
            .with_modified_date(format!("{date}T00:00:00Z"))
            .with_date(date);
    }
    metadata
}

/// Title page body: title, law number, promulgation date and the first
/// enact statement.
pub fn title_page(law: &Law) -> String {
    let mut body = String::from(r#"<div class="title-page">"#);
    body.push_str(&format!("<h1>{}</h1>", render_text(law.title())));
    body.push_str(&format!(
        r#"<p class="law-num">{}</p>"#,
        escape_html(&law.law_num)
    ));
    body.push_str(&format!(
        r#"<p class="promulgation">公布日: {}</p>"#,
        escape_html(&law.promulgation.display(""))
    ));
    if let Some(statement) = law.body.enact_statements.iter().find(|s| !s.is_empty()) {
        body.push_str(&format!(
            r#"<div class="enact-statement"><p>{}</p></div>"#,
            render_text(statement)
        ));
    }
    body.push_str("</div>");
    body
}

/// Assemble a parsed statute into EPUB bytes.
///
/// `images: None` omits all figures. The pipeline is consumed: its cache
/// maps sources to paths inside this package only.
pub fn convert_law(
    law: &Law,
    mut images: Option<ImagePipeline>,
    compression_level: Option<i64>,
) -> Result<Vec<u8>> {
    let mut book = EpubBuilder::new()
        .with_metadata(law_metadata(law))
        .with_compression_level(compression_level);

    book.add_stylesheet(STYLESHEET)?;
    book.add_section(&title_page(law), TITLE_PAGE_TITLE, TITLE_PAGE_FILE, None)?;

    {
        let mut ctx = RenderContext::new(&mut book, images.as_mut());
        compile_law(&mut ctx, law)?;
    }

    info!(
        title = law.title().as_str(),
        pages = book.page_count(),
        images = book.asset_paths().count(),
        "assembled package"
    );
    book.serialize()
}

/// Parse statute XML and convert it with the given options.
pub fn convert_bytes(source: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
    let law = parse_law(source)?;
    let pipeline = options.images.as_ref().map(ImageOptions::pipeline).transpose()?;
    convert_law(&law, pipeline, options.compression_level)
}

/// Convert `source` and write the package to `dest`.
///
/// The destination is only touched once the whole package is built, and is
/// replaced atomically, so a failed conversion leaves no partial output.
pub fn convert_file(
    source: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    let data = fs::read(source)?;
    debug!(source = %source.display(), bytes = data.len(), "read source");
    let epub = convert_bytes(&data, options)?;
    write_output(dest, &epub)
}

/// Write `data` to `dest` through a sibling temporary file.
pub fn write_output(dest: &Path, data: &[u8]) -> Result<()> {
    let output_err = |source| Error::OutputIo {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(dir) = dest.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(output_err)?;
    }

    let tmp = partial_path(dest);
    if let Err(e) = fs::write(&tmp, data).and_then(|()| fs::rename(&tmp, dest)) {
        let _ = fs::remove_file(&tmp);
        return Err(output_err(e));
    }
    debug!(dest = %dest.display(), bytes = data.len(), "wrote package");
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    dest.with_file_name(name)
}
