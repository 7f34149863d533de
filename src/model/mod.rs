//! Statute document tree.
//!
//! This module contains:
//! - The document root and promulgation metadata
//! - Organizational nodes (chapters, sections, articles, appendices)
//! - Paragraph-level nodes and the three enumeration levels
//! - Tables
//! - Annotated text runs
//!
//! The tree is immutable input to the compiler; every parent owns its
//! children by value.

mod block;
mod law;
mod structure;
mod table;
mod text;

pub use block::{
    Attachments, FigStruct, FormatStruct, Fragment, Item, ListEntry, MAX_SUBLIST_DEPTH,
    NoteStruct, Paragraph, Remarks, StyleStruct, Subitem1, Subitem2,
};
pub use law::{Era, Law, LawBody, Promulgation};
pub use structure::{
    AppdxFig, AppdxFormat, AppdxNote, AppdxStyle, AppdxTable, ArithFormula, Article, Chapter,
    MainProvision, PartRef, Section, SupplAppdx, SupplAppdxStyle, SupplAppdxTable,
    SupplProvision,
};
pub use table::{Borders, Cell, HeaderCell, Table, TableStruct, WritingMode};
pub use text::{Column, Ruby, Sentences, Text};
