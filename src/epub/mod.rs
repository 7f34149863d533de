//! EPUB 3 package writer.

mod writer;

pub use writer::{CSS_PATH, EpubBuilder, IMAGE_DIR, XHTML_DIR};
pub(crate) use writer::relative_from_page;
