//! Appendix pages: notes, tables, styles, formats and figures.
//!
//! Notes, tables and formats get one top-level page each. Styles and
//! figures are grouped under a parent page.

use super::{add_page, related_articles, title_or};
use crate::error::{Result, ResultExt};
use crate::model::{AppdxFig, AppdxFormat, AppdxNote, AppdxStyle, AppdxTable, Text};
use crate::render::RenderContext;
use crate::render::block::{
    render_format_struct, render_note_struct, render_remarks, render_style_struct,
    render_table_struct,
};
use crate::render::text::render_text;

const NOTE_TITLE: &str = "附則";
const TABLE_TITLE: &str = "附表";
const STYLE_TITLE: &str = "様式";
const FORMAT_TITLE: &str = "書式";
const FIG_TITLE: &str = "附図";

const STYLES_PAGE: &str = "appdx-styles.xhtml";
const FIGS_PAGE: &str = "appdx-figures.xhtml";

pub fn compile_appdx_notes(ctx: &mut RenderContext<'_>, notes: &[AppdxNote]) -> Result<()> {
    for (i, note) in notes.iter().enumerate() {
        compile_note(ctx, note, i).context(|| format!("appendix note {i}"))?;
    }
    Ok(())
}

fn compile_note(ctx: &mut RenderContext<'_>, note: &AppdxNote, index: usize) -> Result<()> {
    let mut body = chapter_heading(note.title.as_ref());
    body.push_str(&related_articles(note.related_article_num.as_ref()));
    for structure in &note.notes {
        body.push_str(&render_note_struct(ctx, structure)?);
    }
    body.push_str(&ctx.figures(&note.figures)?);
    for table in &note.tables {
        body.push_str(&render_table_struct(ctx, table)?);
    }
    if let Some(remarks) = &note.remarks {
        body.push_str(&render_remarks(ctx, remarks)?);
    }

    let title = title_or(note.title.as_ref(), NOTE_TITLE);
    add_page(ctx, &body, title, &format!("appdx-note-{index}.xhtml"), None)?;
    Ok(())
}

pub fn compile_appdx_tables(ctx: &mut RenderContext<'_>, tables: &[AppdxTable]) -> Result<()> {
    for (i, table) in tables.iter().enumerate() {
        compile_table(ctx, table, i).context(|| format!("appendix table {i}"))?;
    }
    Ok(())
}

fn compile_table(ctx: &mut RenderContext<'_>, table: &AppdxTable, index: usize) -> Result<()> {
    let mut body = chapter_heading(table.title.as_ref());
    body.push_str(&related_articles(table.related_article_num.as_ref()));
    for structure in &table.tables {
        body.push_str(&render_table_struct(ctx, structure)?);
    }
    if let Some(remarks) = &table.remarks {
        body.push_str(&render_remarks(ctx, remarks)?);
    }

    let title = title_or(table.title.as_ref(), TABLE_TITLE);
    add_page(ctx, &body, title, &format!("appdx-table-{index}.xhtml"), None)?;
    Ok(())
}

pub fn compile_appdx_styles(ctx: &mut RenderContext<'_>, styles: &[AppdxStyle]) -> Result<()> {
    if styles.is_empty() {
        return Ok(());
    }
    let parent = add_page(
        ctx,
        &format!("<h2>{STYLE_TITLE}</h2>"),
        STYLE_TITLE,
        STYLES_PAGE,
        None,
    )?;

    for (i, style) in styles.iter().enumerate() {
        compile_style(ctx, style, &parent, i).context(|| format!("appendix style {i}"))?;
    }
    Ok(())
}

fn compile_style(
    ctx: &mut RenderContext<'_>,
    style: &AppdxStyle,
    parent: &str,
    index: usize,
) -> Result<()> {
    let mut body = section_heading(style.title.as_ref());
    body.push_str(&related_articles(style.related_article_num.as_ref()));
    for structure in &style.styles {
        body.push_str(&render_style_struct(ctx, structure)?);
    }
    if let Some(remarks) = &style.remarks {
        body.push_str(&render_remarks(ctx, remarks)?);
    }

    let title = title_or(style.title.as_ref(), STYLE_TITLE);
    add_page(
        ctx,
        &body,
        title,
        &format!("appdx-style-{index}.xhtml"),
        Some(parent),
    )?;
    Ok(())
}

pub fn compile_appdx_formats(ctx: &mut RenderContext<'_>, formats: &[AppdxFormat]) -> Result<()> {
    for (i, format) in formats.iter().enumerate() {
        compile_format(ctx, format, i).context(|| format!("appendix format {i}"))?;
    }
    Ok(())
}

fn compile_format(ctx: &mut RenderContext<'_>, format: &AppdxFormat, index: usize) -> Result<()> {
    let mut body = chapter_heading(format.title.as_ref());
    body.push_str(&related_articles(format.related_article_num.as_ref()));
    for structure in &format.formats {
        body.push_str(&render_format_struct(ctx, structure)?);
    }

    let title = title_or(format.title.as_ref(), FORMAT_TITLE);
    add_page(ctx, &body, title, &format!("appdx-format-{index}.xhtml"), None)?;
    Ok(())
}

pub fn compile_appdx_figs(ctx: &mut RenderContext<'_>, figs: &[AppdxFig]) -> Result<()> {
    if figs.is_empty() {
        return Ok(());
    }
    let parent = add_page(
        ctx,
        &format!("<h2>{FIG_TITLE}</h2>"),
        FIG_TITLE,
        FIGS_PAGE,
        None,
    )?;

    for (i, fig) in figs.iter().enumerate() {
        compile_fig(ctx, fig, &parent, i).context(|| format!("appendix figure {i}"))?;
    }
    Ok(())
}

fn compile_fig(
    ctx: &mut RenderContext<'_>,
    fig: &AppdxFig,
    parent: &str,
    index: usize,
) -> Result<()> {
    let mut body = section_heading(fig.title.as_ref());
    body.push_str(&ctx.figures(&fig.figures)?);
    for table in &fig.tables {
        body.push_str(&render_table_struct(ctx, table)?);
    }

    let title = title_or(fig.title.as_ref(), FIG_TITLE);
    add_page(
        ctx,
        &body,
        title,
        &format!("appdx-fig-{index}.xhtml"),
        Some(parent),
    )?;
    Ok(())
}

/// Top-level appendix heading; untitled appendices get none.
fn chapter_heading(title: Option<&Text>) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!(r#"<div class="chapter-title">{}</div>"#, render_text(title)),
        None => String::new(),
    }
}

fn section_heading(title: Option<&Text>) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!("<h3>{}</h3>", render_text(title)),
        None => String::new(),
    }
}
