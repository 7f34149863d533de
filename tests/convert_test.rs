use std::fs;
use std::io::{Cursor, Read};

use lawpub::{ConvertOptions, Error, convert_bytes, convert_file};
use tempfile::TempDir;
use zip::ZipArchive;

const CHAPTERED_LAW: &str = include_str!("fixtures/chaptered_law.xml");

const PARAGRAPH_LAW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Law Era="Heisei" Year="11" PromulgateMonth="7" PromulgateDay="16" Lang="ja">
  <LawNum>平成十一年政令第二百号</LawNum>
  <LawBody>
    <LawTitle>段落のみの政令</LawTitle>
    <MainProvision>
      <Paragraph Num="1">
        <ParagraphNum/>
        <ParagraphSentence><Sentence>第一の段落。</Sentence></ParagraphSentence>
      </Paragraph>
      <Paragraph Num="2">
        <ParagraphNum>２</ParagraphNum>
        <ParagraphSentence><Sentence>第二の段落。</Sentence></ParagraphSentence>
      </Paragraph>
    </MainProvision>
  </LawBody>
</Law>"#;

fn open(epub: &[u8]) -> ZipArchive<Cursor<&[u8]>> {
    ZipArchive::new(Cursor::new(epub)).expect("valid zip")
}

fn read_entry(zip: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> String {
    let mut file = zip.by_name(name).unwrap_or_else(|_| panic!("missing {name}"));
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn test_chapter_with_nested_article() {
    let epub = convert_bytes(CHAPTERED_LAW.as_bytes(), &ConvertOptions::new()).unwrap();
    let mut zip = open(&epub);

    let chapter = read_entry(&mut zip, "OEBPS/xhtml/chapter-0.xhtml");
    assert!(chapter.contains("<title>第一章　総則</title>"));

    let article = read_entry(&mut zip, "OEBPS/xhtml/article-0-0.xhtml");
    assert!(article.contains("<h3>第一条 （目的）</h3>"));
    assert_eq!(article.matches("<ol>").count(), 1);
    assert!(article.contains("<li>これはテストです。</li>"));

    let nav = read_entry(&mut zip, "OEBPS/nav.xhtml");
    let chapter_pos = nav.find("xhtml/chapter-0.xhtml").unwrap();
    let article_pos = nav.find("xhtml/article-0-0.xhtml").unwrap();
    assert!(chapter_pos < article_pos);
    assert_eq!(nav.matches("xhtml/article-").count(), 1);
}

#[test]
fn test_package_layout() {
    let epub = convert_bytes(CHAPTERED_LAW.as_bytes(), &ConvertOptions::new()).unwrap();
    let mut zip = open(&epub);

    assert_eq!(zip.by_index(0).unwrap().name(), "mimetype");

    let opf = read_entry(&mut zip, "OEBPS/content.opf");
    assert!(opf.contains("<dc:title id=\"title1\">テスト法</dc:title>"));
    assert!(opf.contains("令和五年法律第十七号</dc:creator>"));
    assert!(opf.contains("<dc:date>2023-06-14</dc:date>"));

    // Title page first, then the body, then the supplementary provision.
    let title = opf.find("xhtml/title.xhtml").unwrap();
    let chapter = opf.find("xhtml/chapter-0.xhtml").unwrap();
    let suppl = opf.find("xhtml/suppl-provision-0.xhtml").unwrap();
    assert!(title < chapter && chapter < suppl);

    let title_page = read_entry(&mut zip, "OEBPS/xhtml/title.xhtml");
    assert!(title_page.contains("公布日: 令和5年6月14日"));
    assert!(title_page.contains("ここにテスト法を公布する。"));

    let suppl_page = read_entry(&mut zip, "OEBPS/xhtml/suppl-provision-0.xhtml");
    assert!(suppl_page.contains("<title>附　則</title>"));

    let css = read_entry(&mut zip, "OEBPS/css/style.css");
    assert!(css.contains(".vertical-writing"));
}

#[test]
fn test_direct_paragraphs_become_top_level_pages() {
    let epub = convert_bytes(PARAGRAPH_LAW.as_bytes(), &ConvertOptions::new()).unwrap();
    let mut zip = open(&epub);

    let ncx = read_entry(&mut zip, "OEBPS/toc.ncx");
    // Title page plus one page per paragraph, none nested.
    assert_eq!(ncx.matches("<navPoint").count(), 3);
    assert!(ncx.contains("<text>第1項</text>"));
    assert!(ncx.contains("<text>第２項</text>"));

    let second = read_entry(&mut zip, "OEBPS/xhtml/paragraph-1.xhtml");
    assert!(second.contains("第二の段落。"));
}

#[test]
fn test_convert_file_writes_destination() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("law.xml");
    let dest = dir.path().join("out/law.epub");
    fs::write(&source, CHAPTERED_LAW).unwrap();

    convert_file(&source, &dest, &ConvertOptions::new()).unwrap();

    let epub = fs::read(&dest).unwrap();
    let mut zip = open(&epub);
    assert_eq!(read_entry(&mut zip, "mimetype"), "application/epub+zip");
    assert!(!dir.path().join("out/law.epub.partial").exists());
}

#[test]
fn test_missing_title_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("broken.xml");
    let dest = dir.path().join("broken.epub");
    fs::write(
        &source,
        "<Law><LawNum>令和五年法律第一号</LawNum><LawBody><MainProvision/></LawBody></Law>",
    )
    .unwrap();

    let err = convert_file(&source, &dest, &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredField("LawTitle")));
    assert!(!dest.exists());
}

#[test]
fn test_malformed_input_is_rejected() {
    let err = convert_bytes(b"<Law><LawNum>x</LawBody></Law>", &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
    assert!(!err.is_figure_level());
}

#[test]
fn test_output_is_deterministic() {
    let a = convert_bytes(CHAPTERED_LAW.as_bytes(), &ConvertOptions::new()).unwrap();
    let b = convert_bytes(CHAPTERED_LAW.as_bytes(), &ConvertOptions::new()).unwrap();
    let mut za = open(&a);
    let mut zb = open(&b);
    assert_eq!(
        read_entry(&mut za, "OEBPS/content.opf"),
        read_entry(&mut zb, "OEBPS/content.opf")
    );
}
