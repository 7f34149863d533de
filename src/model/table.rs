//! Tabular structures.

use super::block::Remarks;
use super::structure::PartRef;
use super::text::{Column, Text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritingMode {
    #[default]
    Horizontal,
    Vertical,
}

impl WritingMode {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "vertical" => WritingMode::Vertical,
            _ => WritingMode::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableStruct {
    pub title: Option<Text>,
    pub table: Table,
    pub remarks: Vec<Remarks>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub writing_mode: WritingMode,
    pub header_rows: Vec<Vec<HeaderCell>>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, Default)]
pub struct HeaderCell {
    pub text: Text,
}

/// Declared border style per edge. Empty means not declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Borders {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub rowspan: Option<u32>,
    pub colspan: Option<u32>,
    pub align: String,
    pub valign: String,
    pub borders: Borders,
    pub sentences: Vec<Text>,
    pub columns: Vec<Column>,
    pub parts: Vec<PartRef>,
    /// Titles of articles embedded directly in the cell.
    pub article_titles: Vec<Text>,
}
