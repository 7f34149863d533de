use std::cell::{Cell, RefCell};
use std::io::{Cursor, Read};
use std::rc::Rc;

use image::DynamicImage;
use lawpub::{AttachmentClient, FetchError, ImagePipeline, PdfRasterizer, convert_law, parse_law};
use zip::ZipArchive;

const FIGURE_LAW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Law Era="Reiwa" Year="2" PromulgateMonth="3" PromulgateDay="31" Lang="ja">
  <LawNum>令和二年省令第一号</LawNum>
  <LawBody>
    <LawTitle>図のある省令</LawTitle>
    <MainProvision>
      <Article Num="1">
        <ArticleTitle>第一条</ArticleTitle>
        <Paragraph Num="1">
          <ParagraphNum/>
          <ParagraphSentence><Sentence>次の図による。</Sentence></ParagraphSentence>
          <FigStruct>
            <FigStructTitle>図一</FigStructTitle>
            <Fig src="diagram.pdf"/>
          </FigStruct>
        </Paragraph>
      </Article>
      <Article Num="2">
        <ArticleTitle>第二条</ArticleTitle>
        <Paragraph Num="1">
          <ParagraphNum/>
          <ParagraphSentence><Sentence>前条の図を準用する。</Sentence></ParagraphSentence>
          <FigStruct><Fig src="diagram.pdf"/></FigStruct>
          <FigStruct><Fig src="./pict/missing.png"/></FigStruct>
        </Paragraph>
      </Article>
    </MainProvision>
  </LawBody>
</Law>"#;

/// Serves a fixed payload and records every request.
struct MockClient {
    calls: Rc<RefCell<Vec<String>>>,
}

impl AttachmentClient for MockClient {
    fn fetch_attachment(&self, revision_id: &str, src: &str) -> Result<Vec<u8>, FetchError> {
        assert_eq!(revision_id, "402M60000000001_20200331_000000000000000");
        self.calls.borrow_mut().push(src.to_string());
        if src.contains("missing") {
            return Err(FetchError::NotFound(src.to_string()));
        }
        Ok(b"%PDF-1.4 single page".to_vec())
    }
}

/// Stands in for pdfium: every document has one 4x3 page.
struct SinglePage {
    rendered: Rc<Cell<usize>>,
}

impl PdfRasterizer for SinglePage {
    fn first_page(&self, _src: &str, _data: &[u8]) -> lawpub::Result<DynamicImage> {
        self.rendered.set(self.rendered.get() + 1);
        Ok(DynamicImage::new_rgb8(4, 3))
    }
}

fn read_entry(zip: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Vec<u8> {
    let mut file = zip.by_name(name).unwrap_or_else(|_| panic!("missing {name}"));
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn test_pdf_figure_embedded_once_as_png() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let rendered = Rc::new(Cell::new(0));
    let pipeline = ImagePipeline::new("402M60000000001_20200331_000000000000000")
        .with_client(MockClient {
            calls: calls.clone(),
        })
        .with_rasterizer(SinglePage {
            rendered: rendered.clone(),
        });

    let law = parse_law(FIGURE_LAW.as_bytes()).unwrap();
    let epub = convert_law(&law, Some(pipeline), None).unwrap();

    // diagram.pdf fetched once despite two references; missing.png attempted once.
    assert_eq!(*calls.borrow(), ["diagram.pdf", "./pict/missing.png"]);
    assert_eq!(rendered.get(), 1);

    let mut zip = ZipArchive::new(Cursor::new(epub.as_slice())).unwrap();
    let images: Vec<_> = zip
        .file_names()
        .filter(|n| n.starts_with("OEBPS/images/"))
        .map(str::to_string)
        .collect();
    assert_eq!(images, ["OEBPS/images/diagram.png"]);

    let png = read_entry(&mut zip, "OEBPS/images/diagram.png");
    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 3));

    let first = String::from_utf8(read_entry(&mut zip, "OEBPS/xhtml/article-0.xhtml")).unwrap();
    assert!(first.contains(r#"<p class="figure-title">図一</p>"#));
    assert!(first.contains(r#"src="../images/diagram.png""#));
    assert!(first.contains("max-height: 80vh"));

    // The failed fetch drops only that figure.
    let second = String::from_utf8(read_entry(&mut zip, "OEBPS/xhtml/article-1.xhtml")).unwrap();
    assert_eq!(second.matches("<img ").count(), 1);
    assert!(second.contains("前条の図を準用する。"));

    let opf = String::from_utf8(read_entry(&mut zip, "OEBPS/content.opf")).unwrap();
    assert!(opf.contains(r#"href="images/diagram.png" media-type="image/png""#));
}

fn embedded_images(epub: &[u8]) -> Vec<String> {
    let zip = ZipArchive::new(Cursor::new(epub)).unwrap();
    zip.file_names()
        .filter(|n| n.starts_with("OEBPS/images/"))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_each_conversion_embeds_its_own_figures() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let pipeline = || {
        ImagePipeline::new("402M60000000001_20200331_000000000000000")
            .with_client(MockClient {
                calls: calls.clone(),
            })
            .with_rasterizer(SinglePage {
                rendered: Rc::default(),
            })
    };
    let law = parse_law(FIGURE_LAW.as_bytes()).unwrap();

    let first = convert_law(&law, Some(pipeline()), None).unwrap();
    let second = convert_law(&law, Some(pipeline()), None).unwrap();

    assert_eq!(embedded_images(&first), ["OEBPS/images/diagram.png"]);
    assert_eq!(embedded_images(&second), ["OEBPS/images/diagram.png"]);
    // One fetch per distinct source per conversion.
    assert_eq!(calls.borrow().len(), 4);

    let mut zip = ZipArchive::new(Cursor::new(second.as_slice())).unwrap();
    let page = String::from_utf8(read_entry(&mut zip, "OEBPS/xhtml/article-0.xhtml")).unwrap();
    assert!(page.contains(r#"src="../images/diagram.png""#));
}

#[test]
fn test_max_image_height_is_applied() {
    let pipeline = ImagePipeline::new("402M60000000001_20200331_000000000000000")
        .with_client(MockClient {
            calls: Rc::default(),
        })
        .with_rasterizer(SinglePage {
            rendered: Rc::default(),
        })
        .with_max_image_height("50vh");

    let law = parse_law(FIGURE_LAW.as_bytes()).unwrap();
    let epub = convert_law(&law, Some(pipeline), None).unwrap();
    let mut zip = ZipArchive::new(Cursor::new(epub.as_slice())).unwrap();
    let page = String::from_utf8(read_entry(&mut zip, "OEBPS/xhtml/article-0.xhtml")).unwrap();
    assert!(page.contains("max-height: 50vh"));
}

#[test]
fn test_images_disabled_embeds_nothing() {
    let law = parse_law(FIGURE_LAW.as_bytes()).unwrap();
    let epub = convert_law(&law, None, None).unwrap();
    let zip = ZipArchive::new(Cursor::new(epub.as_slice())).unwrap();
    assert!(!zip.file_names().any(|n| n.contains("images/")));
}

#[test]
fn test_missing_client_aborts_conversion() {
    let law = parse_law(FIGURE_LAW.as_bytes()).unwrap();
    let pipeline = ImagePipeline::new("rev");
    let err = convert_law(&law, Some(pipeline), None).unwrap_err();
    assert!(!err.is_figure_level());
    assert!(err.to_string().contains("attachment client"));
}
