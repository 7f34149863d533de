//! Escaping and annotated-text rendering.

use crate::model::{Column, Ruby, Sentences, Text};

/// Escape special XML/HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render text followed by its ruby decorations.
///
/// Decorations always come after the full escaped text, in input order. The
/// parser does not keep their inline position.
pub fn render_annotated(content: &str, ruby: &[Ruby]) -> String {
    let mut out = escape_html(content);
    for r in ruby {
        push_ruby(&mut out, r);
    }
    out
}

fn push_ruby(out: &mut String, ruby: &Ruby) {
    if ruby.rt.is_empty() {
        out.push_str(&escape_html(&ruby.base));
        return;
    }
    out.push_str("<ruby>");
    out.push_str(&escape_html(&ruby.base));
    for rt in &ruby.rt {
        out.push_str("<rt>");
        out.push_str(&escape_html(rt));
        out.push_str("</rt>");
    }
    out.push_str("</ruby>");
}

pub fn render_text(text: &Text) -> String {
    render_annotated(&text.content, &text.ruby)
}

/// Sentences concatenated, then inline columns.
pub fn render_sentences(sentences: &Sentences) -> String {
    let mut out = String::new();
    for s in &sentences.sentences {
        out.push_str(&render_text(s));
    }
    for column in &sentences.columns {
        out.push_str(&render_column(column));
    }
    out
}

pub fn render_column(column: &Column) -> String {
    let mut out = String::new();
    for s in &column.sentences {
        out.push_str(&render_text(s));
    }
    if column.line_break {
        out.push_str("<br/>");
    }
    out
}
