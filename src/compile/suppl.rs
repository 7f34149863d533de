//! Supplementary provision pages (附則).
//!
//! Each provision is one page. Its chapters, articles, paragraphs and
//! appendices render inline on that page.

use super::main_provision::article_body;
use super::{add_page, related_articles};
use crate::error::{Result, ResultExt};
use crate::model::{Chapter, SupplAppdx, SupplAppdxStyle, SupplAppdxTable, SupplProvision, Text};
use crate::render::RenderContext;
use crate::render::block::{render_paragraphs, render_style_struct, render_table_struct};
use crate::render::text::{escape_html, render_text};

const DEFAULT_LABEL: &str = "附則";

pub fn compile_suppl_provisions(
    ctx: &mut RenderContext<'_>,
    provisions: &[SupplProvision],
) -> Result<()> {
    for (i, provision) in provisions.iter().enumerate() {
        compile_provision(ctx, provision, i).context(|| format!("supplementary provision {i}"))?;
    }
    Ok(())
}

fn compile_provision(
    ctx: &mut RenderContext<'_>,
    provision: &SupplProvision,
    index: usize,
) -> Result<()> {
    let default_label = Text::new(DEFAULT_LABEL);
    let label = if provision.label.is_empty() {
        &default_label
    } else {
        &provision.label
    };

    let mut body = format!(r#"<div class="chapter-title">{}</div>"#, render_text(label));
    if let Some(amend) = &provision.amend_law_num {
        body.push_str(&format!(
            r#"<div class="amend-law-num">（{}）</div>"#,
            escape_html(amend)
        ));
    }

    for chapter in &provision.chapters {
        body.push_str(&chapter_inline(ctx, chapter)?);
    }
    for article in &provision.articles {
        body.push_str(&article_body(ctx, article)?);
    }
    body.push_str(&render_paragraphs(ctx, &provision.paragraphs)?);
    for table in &provision.appdx_tables {
        body.push_str(&appdx_table(ctx, table)?);
    }
    for style in &provision.appdx_styles {
        body.push_str(&appdx_style(ctx, style)?);
    }
    for appdx in &provision.appdx {
        body.push_str(&arith_appdx(appdx));
    }

    add_page(
        ctx,
        &body,
        &provision_title(provision),
        &format!("suppl-provision-{index}.xhtml"),
        None,
    )?;
    Ok(())
}

/// Label (default 附則) followed by the amending law number, if any.
pub fn provision_title(provision: &SupplProvision) -> String {
    let label = if provision.label.is_empty() {
        DEFAULT_LABEL
    } else {
        provision.label.as_str()
    };
    match &provision.amend_law_num {
        Some(amend) => format!("{label}（{amend}）"),
        None => label.to_string(),
    }
}

fn chapter_inline(ctx: &mut RenderContext<'_>, chapter: &Chapter) -> Result<String> {
    let mut out = format!("<h3>{}</h3>", render_text(&chapter.title));
    for article in &chapter.articles {
        out.push_str(&article_body(ctx, article)?);
    }
    for section in &chapter.sections {
        out.push_str(&format!("<h4>{}</h4>", render_text(&section.title)));
        for article in &section.articles {
            out.push_str(&article_body(ctx, article)?);
        }
    }
    Ok(out)
}

fn appdx_table(ctx: &mut RenderContext<'_>, table: &SupplAppdxTable) -> Result<String> {
    let mut out = String::from(r#"<div class="suppl-appdx-table">"#);
    if !table.title.is_empty() {
        out.push_str(&format!("<h4>{}</h4>", render_text(&table.title)));
    }
    out.push_str(&related_articles(table.related_article_num.as_ref()));
    for structure in &table.tables {
        out.push_str(&render_table_struct(ctx, structure)?);
    }
    out.push_str("</div>");
    Ok(out)
}

fn appdx_style(ctx: &mut RenderContext<'_>, style: &SupplAppdxStyle) -> Result<String> {
    let mut out = String::from(r#"<div class="suppl-appdx-style">"#);
    if !style.title.is_empty() {
        out.push_str(&format!("<h4>{}</h4>", render_text(&style.title)));
    }
    out.push_str(&related_articles(style.related_article_num.as_ref()));
    for structure in &style.styles {
        out.push_str(&render_style_struct(ctx, structure)?);
    }
    out.push_str("</div>");
    Ok(out)
}

/// Formula appendix. Formula bodies are shown as a placeholder.
fn arith_appdx(appdx: &SupplAppdx) -> String {
    let mut out = String::from(r#"<div class="suppl-appdx">"#);
    if let Some(num) = appdx.arith_formula_num.as_ref().filter(|t| !t.is_empty()) {
        out.push_str(&format!(
            r#"<div class="arith-formula-num">{}</div>"#,
            render_text(num)
        ));
    }
    out.push_str(&related_articles(appdx.related_article_num.as_ref()));
    for formula in &appdx.formulas {
        out.push_str(r#"<div class="arith-formula">"#);
        if let Some(num) = formula.num.filter(|&n| n != 0) {
            out.push_str(&format!(r#"<span class="formula-num">({num})</span>"#));
        }
        out.push_str(r#"<span class="formula-content">[算式]</span></div>"#);
    }
    out.push_str("</div>");
    out
}
