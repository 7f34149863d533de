//! Main body pages.
//!
//! The main provision takes one of four shapes: chapters with nested article
//! pages, bare articles, several bare paragraphs, or a single paragraph run.
//! Only the first non-empty shape is compiled.

use tracing::debug;

use super::add_page;
use crate::error::{Result, ResultExt};
use crate::model::{Article, Chapter, MainProvision, Paragraph, Section};
use crate::render::RenderContext;
use crate::render::block::{render_paragraph, render_paragraphs};
use crate::render::text::{escape_html, render_text};

const MAIN_CONTENT_TITLE: &str = "本文";

pub fn compile_main_provision(ctx: &mut RenderContext<'_>, main: &MainProvision) -> Result<()> {
    debug!(
        chapters = main.chapters.len(),
        articles = main.articles.len(),
        paragraphs = main.paragraphs.len(),
        "compiling main provision"
    );

    if !main.chapters.is_empty() {
        for (i, chapter) in main.chapters.iter().enumerate() {
            compile_chapter(ctx, chapter, i).context(|| format!("chapter {i}"))?;
        }
        return Ok(());
    }

    if !main.articles.is_empty() {
        for (i, article) in main.articles.iter().enumerate() {
            let body = article_body(ctx, article).context(|| format!("article {i}"))?;
            add_page(
                ctx,
                &body,
                &article.plain_title(),
                &format!("article-{i}.xhtml"),
                None,
            )
            .context(|| format!("article {i}"))?;
        }
        return Ok(());
    }

    match main.paragraphs.as_slice() {
        [] => Ok(()),
        [_] => {
            let body = render_paragraphs(ctx, &main.paragraphs)?;
            if !body.is_empty() {
                add_page(ctx, &body, MAIN_CONTENT_TITLE, "main-content.xhtml", None)?;
            }
            Ok(())
        }
        paragraphs => {
            for (i, para) in paragraphs.iter().enumerate() {
                compile_paragraph_page(ctx, para, i).context(|| format!("paragraph {i}"))?;
            }
            Ok(())
        }
    }
}

fn compile_chapter(ctx: &mut RenderContext<'_>, chapter: &Chapter, index: usize) -> Result<()> {
    let body = chapter_body(chapter);
    let parent = add_page(
        ctx,
        &body,
        chapter.title.as_str(),
        &format!("chapter-{index}.xhtml"),
        None,
    )?;

    for (a, article) in chapter.articles.iter().enumerate() {
        compile_article_page(ctx, article, &parent, &format!("article-{index}-{a}.xhtml"))?;
    }
    for (s, section) in chapter.sections.iter().enumerate() {
        for (a, article) in section.articles.iter().enumerate() {
            compile_article_page(
                ctx,
                article,
                &parent,
                &format!("article-{index}-{s}-{a}.xhtml"),
            )?;
        }
    }
    Ok(())
}

fn compile_article_page(
    ctx: &mut RenderContext<'_>,
    article: &Article,
    parent: &str,
    filename: &str,
) -> Result<()> {
    let body = article_body(ctx, article)?;
    add_page(ctx, &body, &article.plain_title(), filename, Some(parent))?;
    Ok(())
}

fn compile_paragraph_page(
    ctx: &mut RenderContext<'_>,
    para: &Paragraph,
    index: usize,
) -> Result<()> {
    let title = paragraph_title(para, index);
    let mut body = format!("<h3>{}</h3>", escape_html(&title));
    body.push_str(&render_paragraph(ctx, para)?);
    add_page(ctx, &body, &title, &format!("paragraph-{index}.xhtml"), None)?;
    Ok(())
}

/// Chapter heading plus an inline summary of its sections.
fn chapter_body(chapter: &Chapter) -> String {
    let mut body = format!(
        r#"<div class="chapter-title">{}</div>"#,
        render_text(&chapter.title)
    );
    if !chapter.sections.is_empty() {
        body.push_str(&sections_summary(&chapter.sections));
    }
    body
}

fn sections_summary(sections: &[Section]) -> String {
    let mut out = String::from(r#"<div class="sections">"#);
    for section in sections {
        out.push_str(&format!("<h3>{}</h3>", render_text(&section.title)));
        if let (Some(first), Some(last)) = (section.articles.first(), section.articles.last()) {
            out.push_str(&format!(
                "<p>（{} から {} まで）</p>",
                render_text(&first.title),
                render_text(&last.title)
            ));
        }
    }
    out.push_str("</div>");
    out
}

/// Article heading (title and caption) followed by its paragraphs.
pub fn article_body(ctx: &mut RenderContext<'_>, article: &Article) -> Result<String> {
    let mut heading = render_text(&article.title);
    if let Some(caption) = &article.caption {
        heading.push(' ');
        heading.push_str(&render_text(caption));
    }
    let mut body = format!("<h3>{heading}</h3>");
    body.push_str(&render_paragraphs(ctx, &article.paragraphs)?);
    Ok(body)
}

/// `第N項` from the paragraph's label, its number, or its position.
pub fn paragraph_title(para: &Paragraph, index: usize) -> String {
    if !para.label.is_empty() {
        format!("第{}項", para.label.as_str())
    } else if let Some(num) = para.num {
        format!("第{num}項")
    } else {
        format!("第{}項", index + 1)
    }
}
