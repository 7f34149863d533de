//! Statute XML parsing.
//!
//! Parsing happens in two passes: the raw bytes are decoded and read into a
//! small owned element tree ([`tree`]), then the tree is mapped onto the typed
//! [`crate::model`] nodes ([`law`]).

mod law;
mod tree;

use crate::error::Result;
use crate::model::Law;
use crate::util::{decode_text, extract_xml_encoding, strip_bom};

pub use tree::{Element, Node, parse_document};

/// Parse a statute XML document.
///
/// Fails with [`crate::Error::MalformedInput`] on unparseable input and
/// [`crate::Error::MissingRequiredField`] when `LawNum`, `LawBody` or
/// `LawTitle` is absent.
pub fn parse_law(bytes: &[u8]) -> Result<Law> {
    let bytes = strip_bom(bytes);
    let text = decode_text(bytes, extract_xml_encoding(bytes));
    let root = parse_document(&text)?;
    law::law_from_element(&root)
}
