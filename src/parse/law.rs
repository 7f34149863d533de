//! Mapping from the element tree onto the typed statute model.

use super::tree::{Element, Node};
use crate::error::{Error, Result};
use crate::model::{
    AppdxFig, AppdxFormat, AppdxNote, AppdxStyle, AppdxTable, ArithFormula, Article,
    Attachments, Borders, Cell, Chapter, Column, Era, FigStruct, FormatStruct, Fragment,
    HeaderCell, Item, Law, LawBody, ListEntry, MAX_SUBLIST_DEPTH, MainProvision, NoteStruct,
    Paragraph, PartRef, Promulgation, Remarks, Ruby, Section, Sentences, StyleStruct, Subitem1,
    Subitem2, SupplAppdx, SupplAppdxStyle, SupplAppdxTable, SupplProvision, Table, TableStruct,
    Text, WritingMode,
};

pub(super) fn law_from_element(root: &Element) -> Result<Law> {
    if root.name != "Law" {
        return Err(Error::MalformedInput(format!(
            "expected <Law> root element, found <{}>",
            root.name
        )));
    }

    let law_num = root
        .child("LawNum")
        .ok_or(Error::MissingRequiredField("LawNum"))?
        .text()
        .trim()
        .to_string();
    let body = root
        .child("LawBody")
        .ok_or(Error::MissingRequiredField("LawBody"))?;

    let promulgation = Promulgation {
        era: root.attr("Era").map(Era::from_attr).unwrap_or_default(),
        year: number_attr(root, "Year").unwrap_or(0),
        month: number_attr(root, "PromulgateMonth").unwrap_or(0),
        day: number_attr(root, "PromulgateDay").unwrap_or(0),
    };

    Ok(Law {
        law_num,
        lang: root.attr("Lang").unwrap_or("ja").to_string(),
        promulgation,
        body: law_body(body)?,
    })
}

fn law_body(el: &Element) -> Result<LawBody> {
    let title_el = el
        .child("LawTitle")
        .ok_or(Error::MissingRequiredField("LawTitle"))?;

    Ok(LawBody {
        title: annotated(title_el),
        kana: title_el.attr("Kana").unwrap_or_default().to_string(),
        enact_statements: el.children_named("EnactStatement").map(annotated).collect(),
        main_provision: el
            .child("MainProvision")
            .map(main_provision)
            .unwrap_or_default(),
        suppl_provisions: el.children_named("SupplProvision").map(suppl_provision).collect(),
        appdx_notes: el.children_named("AppdxNote").map(appdx_note).collect(),
        appdx_tables: el.children_named("AppdxTable").map(appdx_table).collect(),
        appdx_styles: el.children_named("AppdxStyle").map(appdx_style).collect(),
        appdx_formats: el.children_named("AppdxFormat").map(appdx_format).collect(),
        appdx_figs: el.children_named("AppdxFig").map(appdx_fig).collect(),
    })
}

// ---------------------------------------------------------------------------
// Text runs
// ---------------------------------------------------------------------------

/// Collect an element's text, lifting `Ruby` children out as decorations.
fn annotated(el: &Element) -> Text {
    let mut text = Text::default();
    collect_annotated(el, &mut text);
    text
}

fn collect_annotated(el: &Element, out: &mut Text) {
    for child in &el.children {
        match child {
            Node::Text(t) => out.content.push_str(t),
            Node::Element(e) if e.name == "Ruby" => out.ruby.push(ruby(e)),
            Node::Element(e) => collect_annotated(e, out),
        }
    }
}

fn ruby(el: &Element) -> Ruby {
    let mut ruby = Ruby::default();
    for child in &el.children {
        match child {
            Node::Text(t) => ruby.base.push_str(t),
            Node::Element(e) if e.name == "Rt" => ruby.rt.push(e.text()),
            Node::Element(e) => ruby.base.push_str(&e.text()),
        }
    }
    ruby
}

fn child_text(el: &Element, name: &str) -> Option<Text> {
    el.child(name).map(annotated)
}

fn number_attr(el: &Element, name: &str) -> Option<u32> {
    el.attr(name).and_then(|v| v.trim().parse().ok())
}

/// `Sentence` and `Column` children of a sentence container.
fn sentences(el: Option<&Element>) -> Sentences {
    let Some(el) = el else {
        return Sentences::default();
    };
    Sentences {
        sentences: el.children_named("Sentence").map(annotated).collect(),
        columns: el.children_named("Column").map(column).collect(),
    }
}

fn column(el: &Element) -> Column {
    let mut sentences: Vec<Text> = el.children_named("Sentence").map(annotated).collect();
    if sentences.is_empty() {
        let text = annotated(el);
        if !text.is_empty() {
            sentences.push(text);
        }
    }
    Column {
        sentences,
        line_break: el.attr("LineBreak") == Some("true"),
    }
}

// ---------------------------------------------------------------------------
// Main provision
// ---------------------------------------------------------------------------

fn main_provision(el: &Element) -> MainProvision {
    MainProvision {
        chapters: el.children_named("Chapter").map(chapter).collect(),
        articles: el.children_named("Article").map(article).collect(),
        paragraphs: el.children_named("Paragraph").map(paragraph).collect(),
    }
}

fn chapter(el: &Element) -> Chapter {
    Chapter {
        title: child_text(el, "ChapterTitle").unwrap_or_default(),
        sections: el.children_named("Section").map(section).collect(),
        articles: el.children_named("Article").map(article).collect(),
    }
}

fn section(el: &Element) -> Section {
    let mut articles: Vec<Article> = el.children_named("Article").map(article).collect();
    // Subsections are flattened into their section.
    for sub in el.children_named("Subsection") {
        articles.extend(sub.children_named("Article").map(article));
        for division in sub.children_named("Division") {
            articles.extend(division.children_named("Article").map(article));
        }
    }
    Section {
        title: child_text(el, "SectionTitle").unwrap_or_default(),
        articles,
    }
}

fn article(el: &Element) -> Article {
    Article {
        title: child_text(el, "ArticleTitle").unwrap_or_default(),
        caption: child_text(el, "ArticleCaption"),
        paragraphs: el.children_named("Paragraph").map(paragraph).collect(),
    }
}

// ---------------------------------------------------------------------------
// Paragraphs and enumerations
// ---------------------------------------------------------------------------

fn paragraph(el: &Element) -> Paragraph {
    Paragraph {
        num: number_attr(el, "Num").filter(|&n| n > 0),
        label: child_text(el, "ParagraphNum").unwrap_or_default(),
        sentence: sentences(el.child("ParagraphSentence")),
        items: el.children_named("Item").map(item).collect(),
        attachments: attachments(el),
        lists: el.children_named("List").map(|e| list_entry(e, 0)).collect(),
    }
}

fn attachments(el: &Element) -> Attachments {
    Attachments {
        figures: el.children_named("FigStruct").map(fig_struct).collect(),
        tables: el.children_named("TableStruct").map(table_struct).collect(),
        styles: el.children_named("StyleStruct").map(style_struct).collect(),
    }
}

fn item(el: &Element) -> Item {
    Item {
        label: child_text(el, "ItemTitle"),
        sentence: sentences(el.child("ItemSentence")),
        children: el.children_named("Subitem1").map(subitem1).collect(),
        attachments: attachments(el),
    }
}

fn subitem1(el: &Element) -> Subitem1 {
    Subitem1 {
        label: child_text(el, "Subitem1Title"),
        sentence: sentences(el.child("Subitem1Sentence")),
        children: el.children_named("Subitem2").map(subitem2).collect(),
        attachments: attachments(el),
    }
}

fn subitem2(el: &Element) -> Subitem2 {
    Subitem2 {
        label: child_text(el, "Subitem2Title"),
        sentence: sentences(el.child("Subitem2Sentence")),
        attachments: attachments(el),
    }
}

/// `List` at depth 0, `SublistN` at depth N. Nothing below `Sublist3` is read.
fn list_entry(el: &Element, depth: usize) -> ListEntry {
    let sentence_name = format!("{}Sentence", el.name);
    let children = if depth < MAX_SUBLIST_DEPTH {
        let child_name = format!("Sublist{}", depth + 1);
        el.children_named(&child_name)
            .map(|e| list_entry(e, depth + 1))
            .collect()
    } else {
        Vec::new()
    };
    ListEntry {
        sentence: sentences(el.child(&sentence_name)),
        children,
    }
}

// ---------------------------------------------------------------------------
// Figures, remarks, tables
// ---------------------------------------------------------------------------

fn fig_struct(el: &Element) -> FigStruct {
    FigStruct {
        title: child_text(el, "FigStructTitle"),
        src: el
            .child("Fig")
            .and_then(|fig| fig.attr("src"))
            .unwrap_or_default()
            .to_string(),
        remarks: el.children_named("Remarks").map(remarks).collect(),
    }
}

fn remarks(el: &Element) -> Remarks {
    Remarks {
        label: child_text(el, "RemarksLabel").unwrap_or_default(),
        sentences: el.children_named("Sentence").map(annotated).collect(),
        items: el.children_named("Item").map(item).collect(),
    }
}

fn table_struct(el: &Element) -> TableStruct {
    TableStruct {
        title: child_text(el, "TableStructTitle"),
        table: el.child("Table").map(table).unwrap_or_default(),
        remarks: el.children_named("Remarks").map(remarks).collect(),
    }
}

fn table(el: &Element) -> Table {
    Table {
        writing_mode: el
            .attr("WritingMode")
            .map(WritingMode::from_attr)
            .unwrap_or_default(),
        header_rows: el
            .children_named("TableHeaderRow")
            .map(|row| {
                row.children_named("TableHeaderColumn")
                    .map(|c| HeaderCell { text: annotated(c) })
                    .collect()
            })
            .collect(),
        rows: el
            .children_named("TableRow")
            .map(|row| row.children_named("TableColumn").map(cell).collect())
            .collect(),
    }
}

fn cell(el: &Element) -> Cell {
    let attr = |name: &str| el.attr(name).unwrap_or_default().to_string();
    Cell {
        rowspan: number_attr(el, "rowspan"),
        colspan: number_attr(el, "colspan"),
        align: attr("Align"),
        valign: attr("Valign"),
        borders: Borders {
            top: attr("BorderTop"),
            bottom: attr("BorderBottom"),
            left: attr("BorderLeft"),
            right: attr("BorderRight"),
        },
        sentences: el.children_named("Sentence").map(annotated).collect(),
        columns: el.children_named("Column").map(column).collect(),
        parts: el.children_named("Part").map(part_ref).collect(),
        article_titles: el.children_named("Article").map(article_title).collect(),
    }
}

fn article_title(el: &Element) -> Text {
    child_text(el, "ArticleTitle").unwrap_or_default()
}

fn part_ref(el: &Element) -> PartRef {
    let mut articles = Vec::new();
    el.descendants_named("Article", &mut articles);
    PartRef {
        title: child_text(el, "PartTitle").unwrap_or_default(),
        article_titles: articles.into_iter().map(article_title).collect(),
    }
}

// ---------------------------------------------------------------------------
// Style, format and note blocks
// ---------------------------------------------------------------------------

const FRAGMENT_CLAIMED: &[&str] = &["Fig", "FigStruct", "Paragraph", "TableStruct"];

fn fragment(el: Option<&Element>) -> Fragment {
    let Some(el) = el else {
        return Fragment::default();
    };

    let mut figs = Vec::new();
    for child in el.elements() {
        match child.name.as_str() {
            "Fig" => figs.push(child),
            // Paragraphs render their own figures.
            "Paragraph" => {}
            _ => child.descendants_named("Fig", &mut figs),
        }
    }

    let mut text = String::new();
    for child in &el.children {
        match child {
            Node::Text(t) => push_residual(&mut text, t),
            Node::Element(e) if FRAGMENT_CLAIMED.contains(&e.name.as_str()) => {}
            Node::Element(e) => push_residual(&mut text, &e.text()),
        }
    }

    Fragment {
        figures: figs
            .into_iter()
            .filter_map(|fig| fig.attr("src"))
            .map(FigStruct::new)
            .collect(),
        paragraphs: el.children_named("Paragraph").map(paragraph).collect(),
        tables: el.children_named("TableStruct").map(table_struct).collect(),
        text,
    }
}

fn push_residual(out: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(text);
}

fn style_struct(el: &Element) -> StyleStruct {
    StyleStruct {
        title: child_text(el, "StyleStructTitle"),
        content: fragment(el.child("Style")),
        remarks: el.children_named("Remarks").map(remarks).collect(),
    }
}

fn format_struct(el: &Element) -> FormatStruct {
    FormatStruct {
        title: child_text(el, "FormatStructTitle"),
        content: fragment(el.child("Format")),
        remarks: el.children_named("Remarks").map(remarks).collect(),
    }
}

fn note_struct(el: &Element) -> NoteStruct {
    NoteStruct {
        title: child_text(el, "NoteStructTitle"),
        content: fragment(el.child("Note")),
        remarks: el.children_named("Remarks").map(remarks).collect(),
    }
}

// ---------------------------------------------------------------------------
// Appendices
// ---------------------------------------------------------------------------

fn appdx_note(el: &Element) -> AppdxNote {
    AppdxNote {
        title: child_text(el, "AppdxNoteTitle"),
        related_article_num: child_text(el, "RelatedArticleNum"),
        notes: el.children_named("NoteStruct").map(note_struct).collect(),
        figures: el.children_named("FigStruct").map(fig_struct).collect(),
        tables: el.children_named("TableStruct").map(table_struct).collect(),
        remarks: el.child("Remarks").map(remarks),
    }
}

fn appdx_table(el: &Element) -> AppdxTable {
    AppdxTable {
        title: child_text(el, "AppdxTableTitle"),
        related_article_num: child_text(el, "RelatedArticleNum"),
        tables: el.children_named("TableStruct").map(table_struct).collect(),
        remarks: el.child("Remarks").map(remarks),
    }
}

fn appdx_style(el: &Element) -> AppdxStyle {
    AppdxStyle {
        title: child_text(el, "AppdxStyleTitle"),
        related_article_num: child_text(el, "RelatedArticleNum"),
        styles: el.children_named("StyleStruct").map(style_struct).collect(),
        remarks: el.child("Remarks").map(remarks),
    }
}

fn appdx_format(el: &Element) -> AppdxFormat {
    AppdxFormat {
        title: child_text(el, "AppdxFormatTitle"),
        related_article_num: child_text(el, "RelatedArticleNum"),
        formats: el.children_named("FormatStruct").map(format_struct).collect(),
    }
}

fn appdx_fig(el: &Element) -> AppdxFig {
    AppdxFig {
        title: child_text(el, "AppdxFigTitle"),
        figures: el.children_named("FigStruct").map(fig_struct).collect(),
        tables: el.children_named("TableStruct").map(table_struct).collect(),
    }
}

fn suppl_provision(el: &Element) -> SupplProvision {
    SupplProvision {
        label: child_text(el, "SupplProvisionLabel").unwrap_or_default(),
        amend_law_num: el
            .attr("AmendLawNum")
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        chapters: el.children_named("Chapter").map(chapter).collect(),
        articles: el.children_named("Article").map(article).collect(),
        paragraphs: el.children_named("Paragraph").map(paragraph).collect(),
        appdx_tables: el
            .children_named("SupplProvisionAppdxTable")
            .map(|e| SupplAppdxTable {
                title: child_text(e, "SupplProvisionAppdxTableTitle").unwrap_or_default(),
                related_article_num: child_text(e, "RelatedArticleNum"),
                tables: e.children_named("TableStruct").map(table_struct).collect(),
            })
            .collect(),
        appdx_styles: el
            .children_named("SupplProvisionAppdxStyle")
            .map(|e| SupplAppdxStyle {
                title: child_text(e, "SupplProvisionAppdxStyleTitle").unwrap_or_default(),
                related_article_num: child_text(e, "RelatedArticleNum"),
                styles: e.children_named("StyleStruct").map(style_struct).collect(),
            })
            .collect(),
        appdx: el
            .children_named("SupplProvisionAppdx")
            .map(|e| SupplAppdx {
                arith_formula_num: child_text(e, "ArithFormulaNum"),
                related_article_num: child_text(e, "RelatedArticleNum"),
                formulas: e
                    .children_named("ArithFormula")
                    .map(|f| ArithFormula {
                        num: number_attr(f, "Num"),
                    })
                    .collect(),
            })
            .collect(),
    }
}
