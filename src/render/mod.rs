//! HTML rendering of statute nodes.
//!
//! Leaf renderers ([`text`], [`list_style`], [`table`]) are pure functions.
//! Anything that can contain a figure renders through a [`RenderContext`],
//! which owns access to the output archive and the image pipeline.

pub mod block;
pub mod enumeration;
pub mod figure;
pub mod list_style;
pub mod table;
pub mod text;

use tracing::warn;

use crate::book::Archive;
use crate::error::Result;
use crate::images::ImagePipeline;
use crate::model::FigStruct;

/// Stylesheet registered once per package.
pub const STYLESHEET: &str = include_str!("style.css");

/// Mutable state threaded through one page render.
pub struct RenderContext<'a> {
    archive: &'a mut dyn Archive,
    images: Option<&'a mut ImagePipeline>,
}

impl<'a> RenderContext<'a> {
    /// `images: None` leaves every figure out of the output.
    pub fn new(archive: &'a mut dyn Archive, images: Option<&'a mut ImagePipeline>) -> Self {
        Self { archive, images }
    }

    pub fn archive(&mut self) -> &mut dyn Archive {
        &mut *self.archive
    }

    /// Markup for one figure, or an empty string.
    ///
    /// Figure-level failures are logged and swallowed; anything else (an
    /// archive failure, a missing fetch client) is returned.
    pub fn figure(&mut self, fig: &FigStruct) -> Result<String> {
        let Some(images) = self.images.as_deref_mut() else {
            return Ok(String::new());
        };
        let path = match images.resolve(&fig.src, &mut *self.archive) {
            Ok(Some(path)) => path,
            Ok(None) => return Ok(String::new()),
            Err(e) if e.is_figure_level() => {
                warn!(src = %fig.src, error = %e, "figure omitted");
                return Ok(String::new());
            }
            Err(e) => return Err(e),
        };
        let max_height = images.max_image_height().to_string();
        figure::render_figure(self, fig, &path, &max_height)
    }

    /// Markup for a run of figures.
    pub fn figures(&mut self, figs: &[FigStruct]) -> Result<String> {
        let mut out = String::new();
        for fig in figs {
            out.push_str(&self.figure(fig)?);
        }
        Ok(out)
    }
}
