//! Structural compiler: statute tree to archive pages.
//!
//! Pages are registered in reading order. The main body comes first, then
//! the appendices (notes, tables, styles, formats, figures) and finally the
//! supplementary provisions. Filenames derive from each node's position, so
//! the same input always yields the same package layout.

mod appendix;
mod main_provision;
mod suppl;

pub use appendix::{
    compile_appdx_figs, compile_appdx_formats, compile_appdx_notes, compile_appdx_styles,
    compile_appdx_tables,
};
pub use main_provision::{article_body, compile_main_provision, paragraph_title};
pub use suppl::compile_suppl_provisions;

use tracing::debug;

use crate::error::Result;
use crate::model::{Law, Text};
use crate::render::RenderContext;
use crate::render::text::render_text;

/// Register every content page of `law`.
pub fn compile_law(ctx: &mut RenderContext<'_>, law: &Law) -> Result<()> {
    let body = &law.body;

    compile_main_provision(ctx, &body.main_provision)?;
    compile_appdx_notes(ctx, &body.appdx_notes)?;
    compile_appdx_tables(ctx, &body.appdx_tables)?;
    compile_appdx_styles(ctx, &body.appdx_styles)?;
    compile_appdx_formats(ctx, &body.appdx_formats)?;
    compile_appdx_figs(ctx, &body.appdx_figs)?;
    compile_suppl_provisions(ctx, &body.suppl_provisions)?;

    debug!(law_num = %law.law_num, "compiled statute body");
    Ok(())
}

/// Register one page, returning the filename children should name as parent.
fn add_page(
    ctx: &mut RenderContext<'_>,
    body: &str,
    title: &str,
    filename: &str,
    parent: Option<&str>,
) -> Result<String> {
    ctx.archive().add_section(body, title, filename, parent)?;
    Ok(filename.to_string())
}

/// `<div class="related-articles">` for an appendix's article reference.
fn related_articles(related: Option<&Text>) -> String {
    match related.filter(|t| !t.is_empty()) {
        Some(text) => format!(r#"<div class="related-articles">{}</div>"#, render_text(text)),
        None => String::new(),
    }
}

/// Display title of an optional heading, with a fallback.
fn title_or<'a>(title: Option<&'a Text>, fallback: &'a str) -> &'a str {
    title
        .map(Text::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback)
}
