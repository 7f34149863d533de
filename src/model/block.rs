//! Paragraph-level nodes: paragraphs, the three enumeration levels, freeform
//! lists, figures, remarks and the embedded style/format/note blocks.

use super::table::TableStruct;
use super::text::{Sentences, Text};

/// Figures, tables and style blocks that may hang off a paragraph or any
/// enumeration level.
#[derive(Debug, Clone, Default)]
pub struct Attachments {
    pub figures: Vec<FigStruct>,
    pub tables: Vec<TableStruct>,
    pub styles: Vec<StyleStruct>,
}

#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Ordinal number; `Some` places the paragraph in an ordered list.
    pub num: Option<u32>,
    /// Marker text (`ParagraphNum`), often empty for the first paragraph.
    pub label: Text,
    pub sentence: Sentences,
    pub items: Vec<Item>,
    pub attachments: Attachments,
    pub lists: Vec<ListEntry>,
}

impl Paragraph {
    pub fn is_ordinal(&self) -> bool {
        self.num.is_some()
    }
}

/// First enumeration level (号).
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub label: Option<Text>,
    pub sentence: Sentences,
    pub children: Vec<Subitem1>,
    pub attachments: Attachments,
}

/// Second enumeration level.
#[derive(Debug, Clone, Default)]
pub struct Subitem1 {
    pub label: Option<Text>,
    pub sentence: Sentences,
    pub children: Vec<Subitem2>,
    pub attachments: Attachments,
}

/// Deepest enumeration level; carries no further nesting.
#[derive(Debug, Clone, Default)]
pub struct Subitem2 {
    pub label: Option<Text>,
    pub sentence: Sentences,
    pub attachments: Attachments,
}

/// Freeform list entry (`List`, `Sublist1`..`Sublist3`).
///
/// The parser stops descending below `Sublist3`.
#[derive(Debug, Clone, Default)]
pub struct ListEntry {
    pub sentence: Sentences,
    pub children: Vec<ListEntry>,
}

/// Maximum nesting of freeform lists below the top `List` level.
pub const MAX_SUBLIST_DEPTH: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct FigStruct {
    pub title: Option<Text>,
    /// Source reference of the backing asset. Empty for placeholders.
    pub src: String,
    pub remarks: Vec<Remarks>,
}

impl FigStruct {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Remarks {
    pub label: Text,
    pub sentences: Vec<Text>,
    pub items: Vec<Item>,
}

/// Content of `Style`, `Format` and `Note` elements, which embed arbitrary
/// statute fragments.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub figures: Vec<FigStruct>,
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<TableStruct>,
    /// Residual text not claimed by any structured child.
    pub text: String,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
            && self.paragraphs.is_empty()
            && self.tables.is_empty()
            && self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyleStruct {
    pub title: Option<Text>,
    pub content: Fragment,
    pub remarks: Vec<Remarks>,
}

#[derive(Debug, Clone, Default)]
pub struct FormatStruct {
    pub title: Option<Text>,
    pub content: Fragment,
    pub remarks: Vec<Remarks>,
}

#[derive(Debug, Clone, Default)]
pub struct NoteStruct {
    pub title: Option<Text>,
    pub content: Fragment,
    pub remarks: Vec<Remarks>,
}
