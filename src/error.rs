//! Error types for lawpub operations.
//!
//! Structural errors abort a conversion. Figure-level errors ([`Error::Fetch`]
//! and [`Error::Decode`]) are the only kind the renderer swallows: the figure
//! is left out and the document carries on.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while compiling a statute into an EPUB.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("cannot decode {src}: {reason}")]
    Decode { src: String, reason: String },

    #[error("archive write failed: {0}")]
    ArchiveWrite(String),

    #[error("cannot write {}: {source}", path.display())]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// True for failures scoped to a single figure.
    pub fn is_figure_level(&self) -> bool {
        match self {
            Error::Fetch(_) | Error::Decode { .. } => true,
            Error::Context { source, .. } => source.is_figure_level(),
            _ => false,
        }
    }

    pub(crate) fn decode(src: &str, reason: impl ToString) -> Self {
        Error::Decode {
            src: src.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::ArchiveWrite(e.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::MalformedInput(e.to_string())
    }
}

/// Failures of the attachment fetch client.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("attachment not found: {0}")]
    NotFound(String),

    #[error("network error for {src}: {reason}")]
    Network { src: String, reason: String },

    #[error("empty response for {0}")]
    EmptyResponse(String),
}

/// Attach a location to structural errors.
pub(crate) trait ResultExt<T> {
    fn context<C: FnOnce() -> String>(self, context: C) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<C: FnOnce() -> String>(self, context: C) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: context(),
            source: Box::new(source),
        })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
