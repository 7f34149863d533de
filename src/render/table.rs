//! HTML tables.
//!
//! Cells hold inline sentences, inline columns and part references only;
//! referenced articles are reduced to their titles.

use super::text::{escape_html, render_column, render_text};
use crate::model::{Borders, Cell, PartRef, Table, WritingMode};

/// Border styles passed through as declared; anything else becomes `solid`.
const BORDER_STYLES: [&str; 4] = ["solid", "dashed", "dotted", "double"];

pub fn render_table(table: &Table) -> String {
    let mut out = String::new();

    let class = match table.writing_mode {
        WritingMode::Horizontal => "law-table",
        WritingMode::Vertical => "law-table vertical-writing",
    };
    out.push_str(&format!(
        r#"<div class="table-container"><table class="{class}">"#
    ));

    if !table.header_rows.is_empty() {
        out.push_str("<thead>");
        for row in &table.header_rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str(&format!("<th>{}</th>", render_text(&cell.text)));
            }
            out.push_str("</tr>");
        }
        out.push_str("</thead>");
    }

    out.push_str("<tbody>");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&render_cell(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");

    out.push_str("</table></div>");
    out
}

fn render_cell(cell: &Cell) -> String {
    let mut content = String::new();
    for s in &cell.sentences {
        content.push_str(&render_text(s));
    }
    for column in &cell.columns {
        content.push_str(&render_column(column));
    }
    for part in &cell.parts {
        content.push_str(&render_part(part));
    }
    for title in &cell.article_titles {
        content.push_str(&article_ref(title.as_str()));
    }
    format!("<td{}>{}</td>", cell_attributes(cell), content)
}

fn render_part(part: &PartRef) -> String {
    let mut out = String::new();
    if !part.title.is_empty() {
        out.push_str(&format!(
            r#"<div class="part-title">{}</div>"#,
            render_text(&part.title)
        ));
    }
    for title in &part.article_titles {
        out.push_str(&article_ref(title.as_str()));
    }
    out
}

fn article_ref(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }
    format!(r#"<div class="article-ref">{}</div>"#, escape_html(title))
}

/// Attribute string for a `<td>`, with a leading space when non-empty.
pub fn cell_attributes(cell: &Cell) -> String {
    let mut attrs = Vec::new();

    if let Some(rowspan) = cell.rowspan.filter(|&n| n > 1) {
        attrs.push(format!(r#"rowspan="{rowspan}""#));
    }
    if let Some(colspan) = cell.colspan.filter(|&n| n > 1) {
        attrs.push(format!(r#"colspan="{colspan}""#));
    }
    if !cell.align.is_empty() {
        attrs.push(format!(r#"align="{}""#, escape_html(&cell.align)));
    }
    if !cell.valign.is_empty() {
        attrs.push(format!(r#"valign="{}""#, escape_html(&cell.valign)));
    }
    let style = border_style(&cell.borders);
    if !style.is_empty() {
        attrs.push(format!(r#"style="{}""#, escape_html(&style)));
    }

    if attrs.is_empty() {
        String::new()
    } else {
        format!(" {}", attrs.join(" "))
    }
}

/// Inline CSS for declared borders, `; `-separated.
pub fn border_style(borders: &Borders) -> String {
    let edges = [
        ("top", &borders.top),
        ("bottom", &borders.bottom),
        ("left", &borders.left),
        ("right", &borders.right),
    ];
    edges
        .iter()
        .filter(|(_, value)| !value.is_empty() && value.as_str() != "none")
        .map(|(edge, value)| {
            let style = if BORDER_STYLES.contains(&value.as_str()) {
                value.as_str()
            } else {
                "solid"
            };
            format!("border-{edge}: 1px {style} #ccc")
        })
        .collect::<Vec<_>>()
        .join("; ")
}
