//! Organizational nodes: chapters, sections, articles, appendices and
//! supplementary provisions.

use super::block::{FigStruct, FormatStruct, NoteStruct, Paragraph, Remarks, StyleStruct};
use super::table::TableStruct;
use super::text::Text;

/// The main body. In practice only one of the three collections is populated.
#[derive(Debug, Clone, Default)]
pub struct MainProvision {
    pub chapters: Vec<Chapter>,
    pub articles: Vec<Article>,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default)]
pub struct Chapter {
    pub title: Text,
    pub sections: Vec<Section>,
    pub articles: Vec<Article>,
}

/// Purely organizational: its articles still become their own pages.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub title: Text,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default)]
pub struct Article {
    pub title: Text,
    pub caption: Option<Text>,
    pub paragraphs: Vec<Paragraph>,
}

impl Article {
    /// Title and caption joined for table-of-contents use.
    pub fn plain_title(&self) -> String {
        match &self.caption {
            Some(caption) => format!("{} {}", self.title.as_str(), caption.as_str()),
            None => self.title.as_str().to_string(),
        }
    }
}

/// A `Part` referenced from inside a table cell. Only titles are kept.
#[derive(Debug, Clone, Default)]
pub struct PartRef {
    pub title: Text,
    pub article_titles: Vec<Text>,
}

#[derive(Debug, Clone, Default)]
pub struct AppdxNote {
    pub title: Option<Text>,
    pub related_article_num: Option<Text>,
    pub notes: Vec<NoteStruct>,
    pub figures: Vec<FigStruct>,
    pub tables: Vec<TableStruct>,
    pub remarks: Option<Remarks>,
}

#[derive(Debug, Clone, Default)]
pub struct AppdxTable {
    pub title: Option<Text>,
    pub related_article_num: Option<Text>,
    pub tables: Vec<TableStruct>,
    pub remarks: Option<Remarks>,
}

#[derive(Debug, Clone, Default)]
pub struct AppdxStyle {
    pub title: Option<Text>,
    pub related_article_num: Option<Text>,
    pub styles: Vec<StyleStruct>,
    pub remarks: Option<Remarks>,
}

#[derive(Debug, Clone, Default)]
pub struct AppdxFormat {
    pub title: Option<Text>,
    pub related_article_num: Option<Text>,
    pub formats: Vec<FormatStruct>,
}

#[derive(Debug, Clone, Default)]
pub struct AppdxFig {
    pub title: Option<Text>,
    pub figures: Vec<FigStruct>,
    pub tables: Vec<TableStruct>,
}

#[derive(Debug, Clone, Default)]
pub struct SupplProvision {
    pub label: Text,
    pub amend_law_num: Option<String>,
    pub chapters: Vec<Chapter>,
    pub articles: Vec<Article>,
    pub paragraphs: Vec<Paragraph>,
    pub appdx_tables: Vec<SupplAppdxTable>,
    pub appdx_styles: Vec<SupplAppdxStyle>,
    pub appdx: Vec<SupplAppdx>,
}

#[derive(Debug, Clone, Default)]
pub struct SupplAppdxTable {
    pub title: Text,
    pub related_article_num: Option<Text>,
    pub tables: Vec<TableStruct>,
}

#[derive(Debug, Clone, Default)]
pub struct SupplAppdxStyle {
    pub title: Text,
    pub related_article_num: Option<Text>,
    pub styles: Vec<StyleStruct>,
}

/// Supplementary appendix holding arithmetic formulas.
#[derive(Debug, Clone, Default)]
pub struct SupplAppdx {
    pub arith_formula_num: Option<Text>,
    pub related_article_num: Option<Text>,
    pub formulas: Vec<ArithFormula>,
}

/// Formula bodies are not rendered, only their number.
#[derive(Debug, Clone, Default)]
pub struct ArithFormula {
    pub num: Option<u32>,
}
