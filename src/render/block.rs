//! Paragraph-level rendering.
//!
//! Paragraphs run through a small state machine: consecutive numbered
//! paragraphs share one `<ol>`, and the first unnumbered paragraph closes it.
//! Everything that hangs off a paragraph (items, figures, tables, style
//! blocks, freeform lists) renders in a fixed order after its sentences.

use super::RenderContext;
use super::enumeration::{label_prefix, render_items};
use super::list_style::open_list;
use super::table::render_table;
use super::text::{escape_html, render_sentences, render_text};
use crate::error::Result;
use crate::model::{
    Attachments, FormatStruct, Fragment, ListEntry, NoteStruct, Paragraph, Remarks,
    StyleStruct, TableStruct, Text,
};

/// Render a run of sibling paragraphs.
pub fn render_paragraphs(ctx: &mut RenderContext<'_>, paragraphs: &[Paragraph]) -> Result<String> {
    let mut out = String::new();
    let mut in_list = false;

    for (i, para) in paragraphs.iter().enumerate() {
        if para.is_ordinal() {
            if !in_list {
                let labels: Vec<&str> = paragraphs[i..]
                    .iter()
                    .take_while(|p| p.is_ordinal())
                    .map(|p| p.label.as_str())
                    .collect();
                out.push_str(&open_list(&labels));
                in_list = true;
            }
            out.push_str("<li>");
            out.push_str(&label_prefix(&para.label));
            out.push_str(&render_sentences(&para.sentence));
            out.push_str(&render_tail(ctx, para)?);
            out.push_str("</li>");
        } else {
            if in_list {
                out.push_str("</ol>");
                in_list = false;
            }
            if !para.label.is_empty() {
                out.push_str(&format!("<h4>{}</h4>", render_text(&para.label)));
            }
            if !para.sentence.is_empty() {
                out.push_str("<p>");
                out.push_str(&render_sentences(&para.sentence));
                out.push_str("</p>");
            }
            out.push_str(&render_tail(ctx, para)?);
        }
    }

    if in_list {
        out.push_str("</ol>");
    }
    Ok(out)
}

/// A single paragraph, rendered as a run of one.
pub fn render_paragraph(ctx: &mut RenderContext<'_>, para: &Paragraph) -> Result<String> {
    render_paragraphs(ctx, std::slice::from_ref(para))
}

fn render_tail(ctx: &mut RenderContext<'_>, para: &Paragraph) -> Result<String> {
    let mut out = render_items(ctx, &para.items)?;
    out.push_str(&render_attachments(ctx, &para.attachments)?);
    out.push_str(&render_lists(&para.lists));
    Ok(out)
}

/// Figures, then tables, then style blocks.
pub fn render_attachments(ctx: &mut RenderContext<'_>, attachments: &Attachments) -> Result<String> {
    let mut out = ctx.figures(&attachments.figures)?;
    for table in &attachments.tables {
        out.push_str(&render_table_struct(ctx, table)?);
    }
    for style in &attachments.styles {
        out.push_str(&render_style_struct(ctx, style)?);
    }
    Ok(out)
}

/// Freeform lists as nested `<ul>` elements.
pub fn render_lists(entries: &[ListEntry]) -> String {
    render_list_level(entries, 0)
}

fn render_list_level(entries: &[ListEntry], depth: usize) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let class = if depth == 0 {
        "law-list".to_string()
    } else {
        format!("law-sublist{depth}")
    };

    let mut out = format!(r#"<ul class="{class}">"#);
    for entry in entries {
        out.push_str("<li>");
        out.push_str(&render_sentences(&entry.sentence));
        out.push_str(&render_list_level(&entry.children, depth + 1));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// Titled table followed by its remarks.
pub fn render_table_struct(ctx: &mut RenderContext<'_>, table: &TableStruct) -> Result<String> {
    let mut out = String::from(r#"<div class="table-struct">"#);
    if let Some(title) = non_empty(&table.title) {
        out.push_str(&format!(
            r#"<div class="table-title">{}</div>"#,
            render_text(title)
        ));
    }
    out.push_str(&render_table(&table.table));
    for remarks in &table.remarks {
        out.push_str(&render_remarks(ctx, remarks)?);
    }
    out.push_str("</div>");
    Ok(out)
}

/// Remarks block (備考) in its default presentation.
pub fn render_remarks(ctx: &mut RenderContext<'_>, remarks: &Remarks) -> Result<String> {
    render_remarks_with_class(ctx, remarks, "appdx-remarks", Some("remark"))
}

/// Remarks block with a caller-chosen wrapper class.
///
/// `sentence_class: None` renders bare `<p>` elements.
pub fn render_remarks_with_class(
    ctx: &mut RenderContext<'_>,
    remarks: &Remarks,
    class: &str,
    sentence_class: Option<&str>,
) -> Result<String> {
    let mut out = format!(r#"<div class="{class}">"#);
    if !remarks.label.is_empty() {
        out.push_str(&format!(
            r#"<p class="remarks-label">{}</p>"#,
            render_text(&remarks.label)
        ));
    }
    let open = match sentence_class {
        Some(c) => format!(r#"<p class="{c}">"#),
        None => "<p>".to_string(),
    };
    for sentence in &remarks.sentences {
        out.push_str(&open);
        out.push_str(&render_text(sentence));
        out.push_str("</p>");
    }
    out.push_str(&render_items(ctx, &remarks.items)?);
    out.push_str("</div>");
    Ok(out)
}

/// Style block (様式): figures first, any other content below them.
pub fn render_style_struct(ctx: &mut RenderContext<'_>, style: &StyleStruct) -> Result<String> {
    let mut out = String::from(r#"<div class="style-struct">"#);
    if let Some(title) = non_empty(&style.title) {
        out.push_str(&format!(
            r#"<p class="style-title">{}</p>"#,
            render_text(title)
        ));
    }

    out.push_str(&render_fragment(ctx, &style.content)?);
    let text = style.content.text.trim();
    if !text.is_empty() {
        out.push_str(&format!(
            r#"<div class="style-content">{}</div>"#,
            escape_html(text)
        ));
    }

    for remarks in &style.remarks {
        out.push_str(&render_remarks_with_class(ctx, remarks, "style-remark", None)?);
    }
    out.push_str("</div>");
    Ok(out)
}

/// Format block (書式). Residual text keeps its line layout.
pub fn render_format_struct(ctx: &mut RenderContext<'_>, format: &FormatStruct) -> Result<String> {
    let mut out = String::from(r#"<div class="format-struct">"#);
    if let Some(title) = non_empty(&format.title) {
        out.push_str(&format!("<h3>{}</h3>", render_text(title)));
    }

    out.push_str(r#"<div class="format-content">"#);
    out.push_str(&render_fragment(ctx, &format.content)?);
    let text = format.content.text.trim();
    if !text.is_empty() {
        out.push_str(&format!(
            r#"<pre class="format-raw">{}</pre>"#,
            escape_html(text)
        ));
    }
    out.push_str("</div>");

    for remarks in &format.remarks {
        out.push_str(&render_remarks(ctx, remarks)?);
    }
    out.push_str("</div>");
    Ok(out)
}

/// Note block (記). Structured paragraphs win over residual text.
pub fn render_note_struct(ctx: &mut RenderContext<'_>, note: &NoteStruct) -> Result<String> {
    let mut out = String::from(r#"<div class="note-struct">"#);
    if let Some(title) = non_empty(&note.title) {
        out.push_str(&format!("<h3>{}</h3>", render_text(title)));
    }

    out.push_str(&render_fragment(ctx, &note.content)?);
    let text = note.content.text.trim();
    if note.content.paragraphs.is_empty() && !text.is_empty() {
        out.push_str(&format!(
            r#"<div class="note-content">{}</div>"#,
            escape_html(text)
        ));
    }

    for remarks in &note.remarks {
        out.push_str(&render_remarks(ctx, remarks)?);
    }
    out.push_str("</div>");
    Ok(out)
}

/// Structured parts of an embedded fragment: figures, paragraphs, tables.
fn render_fragment(ctx: &mut RenderContext<'_>, fragment: &Fragment) -> Result<String> {
    let mut out = ctx.figures(&fragment.figures)?;
    out.push_str(&render_paragraphs(ctx, &fragment.paragraphs)?);
    for table in &fragment.tables {
        out.push_str(&render_table_struct(ctx, table)?);
    }
    Ok(out)
}

fn non_empty(text: &Option<Text>) -> Option<&Text> {
    text.as_ref().filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::EpubBuilder;
    use crate::model::{FigStruct, Item, Sentences};

    fn para(num: Option<u32>, label: &str, text: &str) -> Paragraph {
        Paragraph {
            num,
            label: Text::new(label),
            sentence: Sentences::single(text),
            ..Default::default()
        }
    }

    fn with_ctx<T>(f: impl FnOnce(&mut RenderContext<'_>) -> T) -> T {
        let mut archive = EpubBuilder::new();
        let mut ctx = RenderContext::new(&mut archive, None);
        f(&mut ctx)
    }

    #[test]
    fn test_ordinal_run_then_plain_paragraph() {
        let paragraphs = [
            para(Some(1), "１", "前段"),
            para(Some(2), "２", "後段"),
            para(None, "", "附記"),
        ];
        let html = with_ctx(|ctx| render_paragraphs(ctx, &paragraphs)).unwrap();
        assert_eq!(
            html,
            r#"<ol style="list-style-type: decimal;"><li>前段</li><li>後段</li></ol><p>附記</p>"#
        );
    }

    #[test]
    fn test_trailing_ordinal_run_is_closed() {
        let paragraphs = [para(None, "前文", "a"), para(Some(1), "（甲）", "b")];
        let html = with_ctx(|ctx| render_paragraphs(ctx, &paragraphs)).unwrap();
        assert_eq!(
            html,
            r#"<h4>前文</h4><p>a</p><ol style="list-style-type: decimal;"><li><strong>（甲）</strong> b</li></ol>"#
        );
    }

    #[test]
    fn test_plain_paragraph_without_sentences() {
        let p = Paragraph {
            label: Text::new("<x>"),
            ..Default::default()
        };
        let html = with_ctx(|ctx| render_paragraph(ctx, &p)).unwrap();
        assert_eq!(html, "<h4>&lt;x&gt;</h4>");
    }

    #[test]
    fn test_plain_paragraph_label_keeps_ruby() {
        let p = Paragraph {
            label: Text::new("前文").with_ruby(crate::model::Ruby::new("前").with_rt("ぜん")),
            ..Default::default()
        };
        let html = with_ctx(|ctx| render_paragraph(ctx, &p)).unwrap();
        assert_eq!(html, "<h4>前文<ruby>前<rt>ぜん</rt></ruby></h4>");
    }

    #[test]
    fn test_paragraph_items_follow_sentences() {
        let mut p = para(Some(1), "", "本文");
        p.items.push(Item {
            label: Some(Text::new("一")),
            sentence: Sentences::single("号"),
            ..Default::default()
        });
        let html = with_ctx(|ctx| render_paragraph(ctx, &p)).unwrap();
        assert_eq!(
            html,
            r#"<ol><li>本文<ol style="list-style-type: cjk-ideographic;"><li>号</li></ol></li></ol>"#
        );
    }

    #[test]
    fn test_lists_nest_with_level_classes() {
        let entries = [ListEntry {
            sentence: Sentences::single("a"),
            children: vec![ListEntry {
                sentence: Sentences::single("b"),
                children: vec![ListEntry {
                    sentence: Sentences::single("c"),
                    children: Vec::new(),
                }],
            }],
        }];
        assert_eq!(
            render_lists(&entries),
            concat!(
                r#"<ul class="law-list"><li>a"#,
                r#"<ul class="law-sublist1"><li>b"#,
                r#"<ul class="law-sublist2"><li>c</li></ul>"#,
                "</li></ul></li></ul>"
            )
        );
        assert_eq!(render_lists(&[]), "");
    }

    #[test]
    fn test_remarks_default_and_custom_class() {
        let remarks = Remarks {
            label: Text::new("備考"),
            sentences: vec![Text::new("一"), Text::new("二")],
            items: Vec::new(),
        };
        let html = with_ctx(|ctx| render_remarks(ctx, &remarks)).unwrap();
        assert_eq!(
            html,
            r#"<div class="appdx-remarks"><p class="remarks-label">備考</p><p class="remark">一</p><p class="remark">二</p></div>"#
        );

        let html =
            with_ctx(|ctx| render_remarks_with_class(ctx, &remarks, "style-remark", None)).unwrap();
        assert!(html.starts_with(r#"<div class="style-remark">"#));
        assert!(html.contains("<p>一</p>"));
    }

    #[test]
    fn test_style_struct_without_images_keeps_text() {
        let style = StyleStruct {
            title: Some(Text::new("様式第一")),
            content: Fragment {
                figures: vec![FigStruct::new("./pict/S1.pdf")],
                text: "記載要領".to_string(),
                ..Default::default()
            },
            remarks: Vec::new(),
        };
        let html = with_ctx(|ctx| render_style_struct(ctx, &style)).unwrap();
        assert_eq!(
            html,
            r#"<div class="style-struct"><p class="style-title">様式第一</p><div class="style-content">記載要領</div></div>"#
        );
    }

    #[test]
    fn test_format_struct_raw_text_is_escaped() {
        let format = FormatStruct {
            title: Some(Text::new("書式")),
            content: Fragment {
                text: "a < b".to_string(),
                ..Default::default()
            },
            remarks: Vec::new(),
        };
        let html = with_ctx(|ctx| render_format_struct(ctx, &format)).unwrap();
        assert_eq!(
            html,
            r#"<div class="format-struct"><h3>書式</h3><div class="format-content"><pre class="format-raw">a &lt; b</pre></div></div>"#
        );
    }

    #[test]
    fn test_note_struct_prefers_paragraphs() {
        let note = NoteStruct {
            title: None,
            content: Fragment {
                paragraphs: vec![para(None, "", "記述")],
                text: "stray".to_string(),
                ..Default::default()
            },
            remarks: Vec::new(),
        };
        let html = with_ctx(|ctx| render_note_struct(ctx, &note)).unwrap();
        assert_eq!(html, r#"<div class="note-struct"><p>記述</p></div>"#);

        let bare = NoteStruct {
            content: Fragment {
                text: "本文".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let html = with_ctx(|ctx| render_note_struct(ctx, &bare)).unwrap();
        assert_eq!(
            html,
            r#"<div class="note-struct"><div class="note-content">本文</div></div>"#
        );
    }
}
