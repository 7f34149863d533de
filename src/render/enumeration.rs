//! Nested enumerations: items and their two sub-levels.
//!
//! Each level becomes one `<ol>` styled from its labels. Labels that only
//! repeat the list's own numbering are not printed.

use super::RenderContext;
use super::block::render_attachments;
use super::list_style::{is_ordinal_marker, open_list};
use super::text::{render_sentences, render_text};
use crate::error::Result;
use crate::model::{Attachments, Item, Sentences, Subitem1, Subitem2, Text};

/// One enumeration level's entry.
pub trait Enumerated {
    fn label(&self) -> Option<&Text>;
    fn sentence(&self) -> &Sentences;
    fn attachments(&self) -> &Attachments;

    /// The next level down, rendered. The deepest level has none.
    fn nested(&self, _ctx: &mut RenderContext<'_>) -> Result<String> {
        Ok(String::new())
    }
}

impl Enumerated for Item {
    fn label(&self) -> Option<&Text> {
        self.label.as_ref()
    }

    fn sentence(&self) -> &Sentences {
        &self.sentence
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    fn nested(&self, ctx: &mut RenderContext<'_>) -> Result<String> {
        render_level(ctx, &self.children)
    }
}

impl Enumerated for Subitem1 {
    fn label(&self) -> Option<&Text> {
        self.label.as_ref()
    }

    fn sentence(&self) -> &Sentences {
        &self.sentence
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    fn nested(&self, ctx: &mut RenderContext<'_>) -> Result<String> {
        render_level(ctx, &self.children)
    }
}

impl Enumerated for Subitem2 {
    fn label(&self) -> Option<&Text> {
        self.label.as_ref()
    }

    fn sentence(&self) -> &Sentences {
        &self.sentence
    }

    fn attachments(&self) -> &Attachments {
        &self.attachments
    }
}

/// Render a run of items with all nested levels.
pub fn render_items(ctx: &mut RenderContext<'_>, items: &[Item]) -> Result<String> {
    render_level(ctx, items)
}

/// Render one level as an ordered list; empty input renders nothing.
pub fn render_level<E: Enumerated>(ctx: &mut RenderContext<'_>, entries: &[E]) -> Result<String> {
    if entries.is_empty() {
        return Ok(String::new());
    }

    let labels: Vec<&str> = entries
        .iter()
        .filter_map(|e| e.label())
        .map(Text::as_str)
        .collect();
    let mut out = open_list(&labels);

    for entry in entries {
        out.push_str("<li>");
        if let Some(label) = entry.label() {
            out.push_str(&label_prefix(label));
        }
        out.push_str(&render_sentences(entry.sentence()));
        out.push_str(&render_attachments(ctx, entry.attachments())?);
        out.push_str(&entry.nested(ctx)?);
        out.push_str("</li>");
    }

    out.push_str("</ol>");
    Ok(out)
}

/// Bold label followed by a space, unless the label is empty or a bare
/// ordinal marker.
pub fn label_prefix(label: &Text) -> String {
    if label.as_str().is_empty() || is_ordinal_marker(label.as_str()) {
        return String::new();
    }
    format!("<strong>{}</strong> ", render_text(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::EpubBuilder;

    fn item(label: &str, text: &str) -> Item {
        Item {
            label: Some(Text::new(label)),
            sentence: Sentences::single(text),
            ..Default::default()
        }
    }

    fn render(items: &[Item]) -> String {
        let mut archive = EpubBuilder::new();
        let mut ctx = RenderContext::new(&mut archive, None);
        render_items(&mut ctx, items).unwrap()
    }

    #[test]
    fn test_ordinal_labels_are_suppressed() {
        let html = render(&[item("一", "甲"), item("二", "乙")]);
        assert_eq!(
            html,
            r#"<ol style="list-style-type: cjk-ideographic;"><li>甲</li><li>乙</li></ol>"#
        );
    }

    #[test]
    fn test_other_labels_are_bold() {
        let html = render(&[item("（１）", "甲")]);
        assert_eq!(
            html,
            r#"<ol style="list-style-type: decimal;"><li><strong>（１）</strong> 甲</li></ol>"#
        );
    }

    #[test]
    fn test_nested_levels() {
        let mut parent = item("一", "親");
        parent.children.push(Subitem1 {
            label: Some(Text::new("イ")),
            sentence: Sentences::single("子"),
            children: vec![Subitem2 {
                label: Some(Text::new("（１）")),
                sentence: Sentences::single("孫"),
                ..Default::default()
            }],
            ..Default::default()
        });
        let html = render(&[parent]);
        assert_eq!(
            html,
            concat!(
                r#"<ol style="list-style-type: cjk-ideographic;"><li>親"#,
                r#"<ol style="list-style-type: katakana-iroha;"><li>子"#,
                r#"<ol style="list-style-type: decimal;"><li><strong>（１）</strong> 孫</li></ol>"#,
                r#"</li></ol></li></ol>"#
            )
        );
    }

    #[test]
    fn test_unlabelled_entries_use_plain_list() {
        let html = render(&[Item {
            sentence: Sentences::single("x"),
            ..Default::default()
        }]);
        assert_eq!(html, "<ol><li>x</li></ol>");
    }

    #[test]
    fn test_empty_level_renders_nothing() {
        assert_eq!(render(&[]), "");
    }
}
