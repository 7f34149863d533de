//! # lawpub
//!
//! Compile Japanese statute XML (the e-Gov law XML schema) into paginated
//! EPUB 3 ebooks.
//!
//! ## Features
//!
//! - Parse statute XML in UTF-8 or Shift_JIS
//! - One page per chapter, article, appendix and supplementary provision,
//!   nested in the table of contents
//! - Ruby annotations, enumerations, tables (including vertical writing),
//!   style, format and note blocks
//! - Figures fetched from the law API, with PDF attachments rendered to PNG
//!
//! ## Quick Start
//!
//! ```no_run
//! use lawpub::{ConvertOptions, convert_file};
//!
//! // Text only: no network access
//! convert_file("law.xml", "law.epub", &ConvertOptions::new())?;
//! # Ok::<(), lawpub::Error>(())
//! ```
//!
//! ## Working with the Tree
//!
//! The parser and the package writer are usable on their own:
//!
//! ```no_run
//! use lawpub::{convert_law, parse_law};
//!
//! let law = parse_law(&std::fs::read("law.xml")?)?;
//! println!("{} ({})", law.title().as_str(), law.law_num);
//! let epub = convert_law(&law, None, None)?;
//! # Ok::<(), lawpub::Error>(())
//! ```

pub mod book;
pub mod compile;
pub mod convert;
pub mod epub;
pub mod error;
pub mod images;
pub mod model;
pub mod parse;
pub mod render;
pub(crate) mod util;

pub use book::{Archive, Metadata, TocEntry};
pub use convert::{ConvertOptions, ImageOptions, convert_bytes, convert_file, convert_law};
pub use epub::EpubBuilder;
pub use error::{Error, FetchError, Result};
pub use images::{AttachmentClient, ImagePipeline, PdfRasterizer};
pub use model::Law;
pub use parse::parse_law;
