//! Output package abstraction: metadata, navigation and the archive writer
//! interface the compiler renders into.

use crate::error::Result;

/// Package metadata (Dublin Core + extensions)
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: String,
    pub identifier: String,
    pub description: Option<String>,
    /// Publication date (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// `dcterms:modified` timestamp (`YYYY-MM-DDThh:mm:ssZ`).
    pub modified_date: Option<String>,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_modified_date(mut self, modified: impl Into<String>) -> Self {
        self.modified_date = Some(modified.into());
        self
    }
}

/// A table of contents entry (hierarchical)
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub href: String,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TocEntry) -> Self {
        self.children.push(child);
        self
    }

    /// Number of entries in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TocEntry::count).sum::<usize>()
    }

    /// Depth of this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TocEntry::depth).max().unwrap_or(0)
    }
}

/// Destination of rendered pages and assets.
///
/// Pages are registered in reading order. A page may name a previously
/// registered page (by filename) as its parent, which nests it in the table
/// of contents.
pub trait Archive {
    /// Register an XHTML page body; returns its archive-internal path.
    fn add_section(
        &mut self,
        body: &str,
        title: &str,
        filename: &str,
        parent: Option<&str>,
    ) -> Result<String>;

    /// Set the stylesheet linked from every page.
    fn add_stylesheet(&mut self, css: &str) -> Result<()>;

    /// Embed raster bytes; returns the archive-internal path actually used.
    fn add_raster_asset(&mut self, data: Vec<u8>, filename: &str) -> Result<String>;

    /// Produce the final archive bytes.
    fn serialize(&self) -> Result<Vec<u8>>;
}
