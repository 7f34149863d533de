//! Figure markup around an embedded raster asset.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::RenderContext;
use super::block::render_remarks_with_class;
use super::text::{escape_html, render_text};
use crate::epub::relative_from_page;
use crate::error::Result;
use crate::model::FigStruct;

/// Characters escaped in `src` attributes.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// Wrap an embedded asset with the figure title and remarks.
pub fn render_figure(
    ctx: &mut RenderContext<'_>,
    fig: &FigStruct,
    archive_path: &str,
    max_height: &str,
) -> Result<String> {
    let mut out = String::from(
        r#"<div class="figure" style="page-break-inside: avoid; margin: 1em 0; text-align: center;">"#,
    );

    if let Some(title) = fig.title.as_ref().filter(|t| !t.is_empty()) {
        out.push_str(&format!(
            r#"<p class="figure-title">{}</p>"#,
            render_text(title)
        ));
    }

    out.push_str(&img_tag(archive_path, max_height));

    for remarks in &fig.remarks {
        out.push_str(&render_remarks_with_class(ctx, remarks, "figure-remark", None)?);
    }

    out.push_str("</div>");
    Ok(out)
}

/// `<img>` for an archive path, as referenced from a page.
pub fn img_tag(archive_path: &str, max_height: &str) -> String {
    let src = utf8_percent_encode(&relative_from_page(archive_path), PATH).to_string();
    let style = format!(
        "max-width: 100%; max-height: {max_height}; height: auto; display: block; margin: 0 auto; page-break-inside: avoid;"
    );
    format!(
        r#"<img src="{}" alt="Figure" style="{}" />"#,
        escape_html(&src),
        escape_html(&style)
    )
}
