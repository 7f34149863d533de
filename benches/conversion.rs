//! Benchmarks for the statute conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use lawpub::{ConvertOptions, convert_bytes, convert_law, parse_law};

/// Synthetic statute: chapters of articles with numbered paragraphs, items
/// and a table, roughly the shape of a mid-sized act.
fn synthetic_law(chapters: usize, articles_per_chapter: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Law Era="Reiwa" Year="5" PromulgateMonth="4" PromulgateDay="1" Lang="ja">
<LawNum>令和五年法律第一号</LawNum>
<LawBody>
<LawTitle Kana="べんちまーくほう">ベンチマーク法</LawTitle>
<MainProvision>
"#,
    );

    let mut article = 0;
    for c in 0..chapters {
        xml.push_str(&format!(
            "<Chapter Num=\"{}\"><ChapterTitle>第{}章　規定</ChapterTitle>\n",
            c + 1,
            c + 1
        ));
        for _ in 0..articles_per_chapter {
            article += 1;
            xml.push_str(&format!(
                r#"<Article Num="{article}">
<ArticleCaption>（定義）</ArticleCaption>
<ArticleTitle>第{article}条</ArticleTitle>
<Paragraph Num="1"><ParagraphNum/>
<ParagraphSentence><Sentence>この法律において、次の各号に掲げる用語の<Ruby>意義<Rt>いぎ</Rt></Ruby>は、当該各号に定めるところによる。</Sentence></ParagraphSentence>
<Item Num="1"><ItemTitle>一</ItemTitle><ItemSentence><Sentence>第一の用語</Sentence></ItemSentence>
<Subitem1 Num="1"><Subitem1Title>イ</Subitem1Title><Subitem1Sentence><Sentence>細目</Sentence></Subitem1Sentence></Subitem1>
</Item>
<Item Num="2"><ItemTitle>二</ItemTitle><ItemSentence><Sentence>第二の用語</Sentence></ItemSentence></Item>
</Paragraph>
<Paragraph Num="2"><ParagraphNum>２</ParagraphNum>
<ParagraphSentence><Sentence>前項の規定は、次の表による。</Sentence></ParagraphSentence>
<TableStruct><Table>
<TableRow><TableColumn BorderTop="solid"><Sentence>区分</Sentence></TableColumn><TableColumn rowspan="2"><Sentence>金額</Sentence></TableColumn></TableRow>
<TableRow><TableColumn><Sentence>甲</Sentence></TableColumn></TableRow>
</Table></TableStruct>
</Paragraph>
</Article>
"#
            ));
        }
        xml.push_str("</Chapter>\n");
    }

    xml.push_str("</MainProvision>\n</LawBody>\n</Law>\n");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let xml = synthetic_law(20, 10);
    c.bench_function("parse_law", |b| {
        b.iter(|| parse_law(black_box(xml.as_bytes())).unwrap());
    });
}

fn bench_compile(c: &mut Criterion) {
    let xml = synthetic_law(20, 10);
    let law = parse_law(xml.as_bytes()).unwrap();
    c.bench_function("convert_law", |b| {
        b.iter(|| convert_law(black_box(&law), None, None).unwrap());
    });
}

fn bench_end_to_end(c: &mut Criterion) {
    let xml = synthetic_law(20, 10);
    let options = ConvertOptions::new().with_compression_level(1);
    c.bench_function("convert_bytes", |b| {
        b.iter(|| convert_bytes(black_box(xml.as_bytes()), &options).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_compile, bench_end_to_end);
criterion_main!(benches);
