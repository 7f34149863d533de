use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::book::{Archive, Metadata, TocEntry};
use crate::error::{Error, Result};
use crate::util::{name_uuid, short_digest};

/// Directory (under `OEBPS/`) holding page documents.
pub const XHTML_DIR: &str = "xhtml";
/// Directory (under `OEBPS/`) holding embedded raster assets.
pub const IMAGE_DIR: &str = "images";
/// Path (under `OEBPS/`) of the shared stylesheet.
pub const CSS_PATH: &str = "css/style.css";

const NAV_PATH: &str = "nav.xhtml";

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

struct Page {
    href: String,
    title: String,
    body: String,
    children: Vec<usize>,
}

struct Asset {
    href: String,
    data: Vec<u8>,
}

/// In-memory EPUB 3 package.
///
/// Pages and assets are collected through [`Archive`] and written out by
/// [`Archive::serialize`] or [`EpubBuilder::write_to`].
///
/// # Example
///
/// ```
/// use lawpub::book::{Archive, Metadata};
/// use lawpub::epub::EpubBuilder;
///
/// let mut epub = EpubBuilder::new().with_metadata(Metadata::new("テスト法"));
/// let chapter = epub.add_section("<p>本文</p>", "第一章", "chapter-0.xhtml", None)?;
/// assert_eq!(chapter, "xhtml/chapter-0.xhtml");
/// let bytes = epub.serialize()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), lawpub::Error>(())
/// ```
#[derive(Default)]
pub struct EpubBuilder {
    metadata: Metadata,
    pages: Vec<Page>,
    roots: Vec<usize>,
    page_index: HashMap<String, usize>,
    stylesheet: Option<String>,
    assets: Vec<Asset>,
    asset_index: HashMap<String, usize>,
    compression_level: Option<i64>,
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Deflate level (0-9, default 6).
    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    /// Number of registered pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Archive paths of embedded raster assets, in insertion order.
    pub fn asset_paths(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.href.as_str())
    }

    /// Hierarchical table of contents.
    pub fn toc(&self) -> Vec<TocEntry> {
        self.roots.iter().map(|&i| self.toc_entry(i)).collect()
    }

    fn toc_entry(&self, index: usize) -> TocEntry {
        let page = &self.pages[index];
        let mut entry = TocEntry::new(&page.title, &page.href);
        entry.children = page.children.iter().map(|&c| self.toc_entry(c)).collect();
        entry
    }

    /// Page indices in reading order: each page followed by its sub-pages.
    fn reading_order(&self) -> Vec<usize> {
        fn visit(pages: &[Page], index: usize, out: &mut Vec<usize>) {
            out.push(index);
            for &child in &pages[index].children {
                visit(pages, child, out);
            }
        }
        let mut order = Vec::with_capacity(self.pages.len());
        for &root in &self.roots {
            visit(&self.pages, root, &mut order);
        }
        order
    }

    fn identifier(&self) -> String {
        if self.metadata.identifier.is_empty() {
            format!("urn:uuid:{}", name_uuid(self.metadata.title.as_bytes()))
        } else {
            self.metadata.identifier.clone()
        }
    }

    fn language(&self) -> &str {
        if self.metadata.language.is_empty() {
            "ja"
        } else {
            &self.metadata.language
        }
    }

    /// Write the package to any [`Write`] + [`Seek`] destination.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);

        let compression_level = self.compression_level.unwrap_or(6);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level));

        // 1. Write mimetype (must be first, uncompressed)
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        // 2. Write container.xml
        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        let identifier = self.identifier();
        let toc = self.toc();
        let order = self.reading_order();

        // 3. Write content.opf
        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(self.generate_opf(&identifier, &order).as_bytes())?;

        // 4. Write toc.ncx and nav.xhtml
        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(generate_ncx(&self.metadata.title, &identifier, &toc).as_bytes())?;

        zip.start_file(format!("OEBPS/{NAV_PATH}"), deflated)?;
        zip.write_all(generate_nav(self.language(), &toc).as_bytes())?;

        // 5. Write stylesheet
        if let Some(css) = &self.stylesheet {
            zip.start_file(format!("OEBPS/{CSS_PATH}"), deflated)?;
            zip.write_all(css.as_bytes())?;
        }

        // 6. Write pages
        let stylesheet_href = self
            .stylesheet
            .as_ref()
            .map(|_| relative_from_page(CSS_PATH));
        for &index in &order {
            let page = &self.pages[index];
            zip.start_file(format!("OEBPS/{}", page.href), deflated)?;
            let document = wrap_page(
                &page.title,
                &page.body,
                self.language(),
                stylesheet_href.as_deref(),
            );
            zip.write_all(document.as_bytes())?;
        }

        // 7. Write assets (already compressed rasters are stored)
        for asset in &self.assets {
            zip.start_file(format!("OEBPS/{}", asset.href), stored)?;
            zip.write_all(&asset.data)?;
        }

        Ok(zip.finish()?)
    }

    /// Generate content.opf from metadata and the registered content.
    fn generate_opf(&self, identifier: &str, order: &[usize]) -> String {
        let metadata = &self.metadata;
        let mut opf = String::new();

        opf.push_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
        );

        opf.push_str(&format!(
            "    <dc:title id=\"title1\">{}</dc:title>\n",
            escape_xml(&metadata.title)
        ));

        for (i, author) in metadata.authors.iter().enumerate() {
            opf.push_str(&format!(
                "    <dc:creator id=\"creator{}\">{}</dc:creator>\n",
                i + 1,
                escape_xml(author)
            ));
        }

        opf.push_str(&format!(
            "    <dc:language>{}</dc:language>\n",
            escape_xml(self.language())
        ));

        opf.push_str(&format!(
            "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
            escape_xml(identifier)
        ));

        // dcterms:modified (required for EPUB3)
        let modified = metadata
            .modified_date
            .as_deref()
            .unwrap_or("2024-01-01T00:00:00Z");
        opf.push_str(&format!(
            "    <meta property=\"dcterms:modified\">{}</meta>\n",
            escape_xml(modified)
        ));

        if let Some(ref description) = metadata.description {
            opf.push_str(&format!(
                "    <dc:description>{}</dc:description>\n",
                escape_xml(description)
            ));
        }
        if let Some(ref date) = metadata.date {
            opf.push_str(&format!("    <dc:date>{}</dc:date>\n", escape_xml(date)));
        }

        opf.push_str("  </metadata>\n");

        // Manifest
        opf.push_str("  <manifest>\n");
        opf.push_str(
            "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
        );
        opf.push_str(&format!(
            "    <item id=\"nav\" href=\"{NAV_PATH}\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n"
        ));
        if self.stylesheet.is_some() {
            opf.push_str(&format!(
                "    <item id=\"stylesheet\" href=\"{CSS_PATH}\" media-type=\"text/css\"/>\n"
            ));
        }
        for &index in order {
            let href = &self.pages[index].href;
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
                href_to_id(href),
                escape_xml(href)
            ));
        }
        for asset in &self.assets {
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
                href_to_id(&asset.href),
                escape_xml(&asset.href),
                guess_media_type(&asset.href)
            ));
        }
        opf.push_str("  </manifest>\n");

        // Spine
        opf.push_str("  <spine toc=\"ncx\">\n");
        for &index in order {
            opf.push_str(&format!(
                "    <itemref idref=\"{}\"/>\n",
                href_to_id(&self.pages[index].href)
            ));
        }
        opf.push_str("  </spine>\n");

        opf.push_str("</package>\n");
        opf
    }
}

impl Archive for EpubBuilder {
    fn add_section(
        &mut self,
        body: &str,
        title: &str,
        filename: &str,
        parent: Option<&str>,
    ) -> Result<String> {
        let filename = sanitize_path(filename);
        if filename.is_empty() {
            return Err(Error::ArchiveWrite("empty section filename".into()));
        }
        if self.page_index.contains_key(&filename) {
            return Err(Error::ArchiveWrite(format!(
                "duplicate section filename: {filename}"
            )));
        }
        let parent_index = match parent {
            Some(parent) => Some(
                self.page_index
                    .get(&sanitize_path(parent))
                    .copied()
                    .ok_or_else(|| {
                        Error::ArchiveWrite(format!("unknown parent section: {parent}"))
                    })?,
            ),
            None => None,
        };

        let index = self.pages.len();
        let href = format!("{XHTML_DIR}/{filename}");
        self.pages.push(Page {
            href: href.clone(),
            title: title.to_string(),
            body: body.to_string(),
            children: Vec::new(),
        });
        self.page_index.insert(filename, index);
        match parent_index {
            Some(p) => self.pages[p].children.push(index),
            None => self.roots.push(index),
        }

        debug!(%href, title, parent, "registered section");
        Ok(href)
    }

    fn add_stylesheet(&mut self, css: &str) -> Result<()> {
        self.stylesheet = Some(css.to_string());
        Ok(())
    }

    fn add_raster_asset(&mut self, data: Vec<u8>, filename: &str) -> Result<String> {
        let name = sanitize_path(filename);
        let name = name.rsplit('/').next().unwrap_or_default();
        if name.is_empty() {
            return Err(Error::ArchiveWrite(format!(
                "invalid asset filename: {filename:?}"
            )));
        }

        let href = format!("{IMAGE_DIR}/{name}");
        let href = match self.asset_index.get(&href) {
            None => href,
            Some(&i) if self.assets[i].data == data => return Ok(href),
            Some(_) => {
                // Same name, different content: add a content suffix.
                let (stem, ext) = match name.rfind('.') {
                    Some(dot) if dot > 0 => name.split_at(dot),
                    _ => (name, ""),
                };
                let suffixed = format!("{IMAGE_DIR}/{stem}-{}{ext}", short_digest(&data));
                if let Some(&i) = self.asset_index.get(&suffixed) {
                    if self.assets[i].data == data {
                        return Ok(suffixed);
                    }
                    return Err(Error::ArchiveWrite(format!(
                        "asset name collision: {suffixed}"
                    )));
                }
                suffixed
            }
        };

        debug!(%href, bytes = data.len(), "embedded asset");
        self.asset_index.insert(href.clone(), self.assets.len());
        self.assets.push(Asset {
            href: href.clone(),
            data,
        });
        Ok(href)
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }
}

/// Href of an archive path as seen from a page in [`XHTML_DIR`].
pub(crate) fn relative_from_page(path: &str) -> String {
    format!("../{path}")
}

/// Complete XHTML document around a page body.
fn wrap_page(title: &str, body: &str, lang: &str, stylesheet_href: Option<&str>) -> String {
    let mut doc = String::new();
    doc.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
  <meta charset="utf-8"/>
  <title>{}</title>
"#,
        escape_xml(title),
        lang = escape_xml(lang)
    ));
    if let Some(href) = stylesheet_href {
        doc.push_str(&format!(
            "  <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"/>\n",
            escape_xml(href)
        ));
    }
    doc.push_str("</head>\n<body>\n");
    doc.push_str(body);
    doc.push_str("\n</body>\n</html>\n");
    doc
}

/// Generate toc.ncx from TOC entries.
fn generate_ncx(title: &str, identifier: &str, toc: &[TocEntry]) -> String {
    let depth = toc.iter().map(TocEntry::depth).max().unwrap_or(1);
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content=""#,
    );
    ncx.push_str(&escape_xml(identifier));
    ncx.push_str(&format!(
        r#""/>
    <meta name="dtb:depth" content="{depth}"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>"#
    ));
    ncx.push_str(&escape_xml(title));
    ncx.push_str(
        r#"</text>
  </docTitle>
  <navMap>
"#,
    );

    let mut play_order = 1;
    write_nav_points(&mut ncx, toc, &mut play_order, 2);

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

/// Recursively write navPoint elements.
fn write_nav_points(ncx: &mut String, entries: &[TocEntry], play_order: &mut usize, indent: usize) {
    let indent_str = "  ".repeat(indent);

    for entry in entries {
        ncx.push_str(&format!(
            "{}<navPoint id=\"navPoint-{}\" playOrder=\"{}\">\n",
            indent_str, play_order, play_order
        ));
        ncx.push_str(&format!(
            "{}  <navLabel><text>{}</text></navLabel>\n",
            indent_str,
            escape_xml(&entry.title)
        ));
        ncx.push_str(&format!(
            "{}  <content src=\"{}\"/>\n",
            indent_str,
            escape_xml(&entry.href)
        ));

        *play_order += 1;

        if !entry.children.is_empty() {
            write_nav_points(ncx, &entry.children, play_order, indent + 1);
        }

        ncx.push_str(&format!("{}</navPoint>\n", indent_str));
    }
}

/// Generate the EPUB 3 navigation document.
fn generate_nav(lang: &str, toc: &[TocEntry]) -> String {
    let mut nav = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
  <meta charset="utf-8"/>
  <title>目次</title>
</head>
<body>
  <nav epub:type="toc" id="toc">
    <h1>目次</h1>
"#,
        lang = escape_xml(lang)
    );
    write_nav_list(&mut nav, toc, 2);
    nav.push_str("  </nav>\n</body>\n</html>\n");
    nav
}

fn write_nav_list(nav: &mut String, entries: &[TocEntry], indent: usize) {
    let indent_str = "  ".repeat(indent);
    nav.push_str(&format!("{indent_str}<ol>\n"));
    for entry in entries {
        nav.push_str(&format!(
            "{}  <li><a href=\"{}\">{}</a>",
            indent_str,
            escape_xml(&entry.href),
            escape_xml(&entry.title)
        ));
        if entry.children.is_empty() {
            nav.push_str("</li>\n");
        } else {
            nav.push('\n');
            write_nav_list(nav, &entry.children, indent + 2);
            nav.push_str(&format!("{indent_str}  </li>\n"));
        }
    }
    nav.push_str(&format!("{indent_str}</ol>\n"));
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn href_to_id(href: &str) -> String {
    href.replace(['/', '.', ' ', '-'], "_")
}

/// Sanitize a path for use in ZIP (remove leading slashes, normalize).
fn sanitize_path(path: &str) -> String {
    path.trim_start_matches('/')
        .replace('\\', "/")
        .replace("//", "/")
}

/// Guess media type from file extension.
fn guess_media_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xhtml" | "html" | "htm" => "application/xhtml+xml",
        "css" => "text/css",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/path/to/file.xhtml"), "path/to/file.xhtml");
        assert_eq!(sanitize_path("path\\to\\file.xhtml"), "path/to/file.xhtml");
    }

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type("file.xhtml"), "application/xhtml+xml");
        assert_eq!(guess_media_type("style.css"), "text/css");
        assert_eq!(guess_media_type("image.PNG"), "image/png");
    }

    #[test]
    fn test_mimetype_is_first_and_stored() {
        let mut epub = EpubBuilder::new();
        epub.add_section("<p>a</p>", "A", "a.xhtml", None).unwrap();
        let bytes = epub.serialize().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_duplicate_filename_is_rejected() {
        let mut epub = EpubBuilder::new();
        epub.add_section("", "A", "a.xhtml", None).unwrap();
        let err = epub.add_section("", "B", "a.xhtml", None).unwrap_err();
        assert!(matches!(err, Error::ArchiveWrite(_)));
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut epub = EpubBuilder::new();
        let err = epub
            .add_section("", "B", "b.xhtml", Some("missing.xhtml"))
            .unwrap_err();
        assert!(matches!(err, Error::ArchiveWrite(_)));
    }

    #[test]
    fn test_nested_toc_and_reading_order() {
        let mut epub = EpubBuilder::new();
        epub.add_section("", "第一章", "chapter-0.xhtml", None).unwrap();
        epub.add_section("", "附則", "suppl-provision-0.xhtml", None)
            .unwrap();
        epub.add_section("", "第一条", "article-0-0.xhtml", Some("chapter-0.xhtml"))
            .unwrap();

        let toc = epub.toc();
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].children[0].title, "第一条");

        let bytes = epub.serialize().unwrap();
        let opf = read_entry(&bytes, "OEBPS/content.opf");
        let chapter = opf.find("idref=\"xhtml_chapter_0_xhtml\"").unwrap();
        let article = opf.find("idref=\"xhtml_article_0_0_xhtml\"").unwrap();
        let suppl = opf.find("idref=\"xhtml_suppl_provision_0_xhtml\"").unwrap();
        assert!(chapter < article && article < suppl);

        let ncx = read_entry(&bytes, "OEBPS/toc.ncx");
        assert!(ncx.contains("<meta name=\"dtb:depth\" content=\"2\"/>"));
        let nav = read_entry(&bytes, "OEBPS/nav.xhtml");
        assert!(nav.contains("<a href=\"xhtml/article-0-0.xhtml\">第一条</a>"));
    }

    #[test]
    fn test_pages_link_stylesheet() {
        let mut epub = EpubBuilder::new();
        epub.add_stylesheet("p { margin: 0; }").unwrap();
        epub.add_section("<p>x</p>", "T", "t.xhtml", None).unwrap();
        let bytes = epub.serialize().unwrap();

        let page = read_entry(&bytes, "OEBPS/xhtml/t.xhtml");
        assert!(page.contains("href=\"../css/style.css\""));
        assert!(page.contains("<title>T</title>"));
        assert_eq!(read_entry(&bytes, "OEBPS/css/style.css"), "p { margin: 0; }");
    }

    #[test]
    fn test_asset_name_collisions() {
        let mut epub = EpubBuilder::new();
        let a = epub.add_raster_asset(b"one".to_vec(), "fig.png").unwrap();
        let same = epub.add_raster_asset(b"one".to_vec(), "fig.png").unwrap();
        let other = epub.add_raster_asset(b"two".to_vec(), "fig.png").unwrap();

        assert_eq!(a, "images/fig.png");
        assert_eq!(same, a);
        assert_eq!(other, format!("images/fig-{}.png", short_digest(b"two")));
        assert_eq!(epub.asset_paths().count(), 2);
    }

    #[test]
    fn test_identifier_falls_back_to_title_uuid() {
        let epub = EpubBuilder::new().with_metadata(Metadata::new("テスト法"));
        let id = epub.identifier();
        assert!(id.starts_with("urn:uuid:"));
        assert_eq!(id, epub.identifier());
    }
}
