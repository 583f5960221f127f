//! Integration tests for PDF loading, using documents built in memory.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pagesent::{
    assemble, extract_bytes, Error, FilterConfig, LoadOptions, PdfLoader, SentenceRecord,
};

/// One page of a synthetic document.
struct TestPage {
    ops: Vec<Operation>,
    image: bool,
    broken_contents: bool,
}

impl TestPage {
    fn text(ops: Vec<Operation>) -> Self {
        Self {
            ops,
            image: false,
            broken_contents: false,
        }
    }
}

/// A `BT .. ET` block showing `lines` from (x, y) downwards with a 14pt leading.
fn text_block(x: i32, y: i32, size: i32, lines: &[&str]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), size.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push(Operation::new("T*", vec![]));
        }
        ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Build an A4 document with a Courier font as `/F1`.
fn build_pdf(pages: Vec<TestPage>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8],
    ));

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let contents: Object = if page.broken_contents {
            Object::Integer(42)
        } else {
            let content = Content {
                operations: page.ops,
            };
            let data = content.encode().unwrap();
            doc.add_object(Stream::new(dictionary! {}, data)).into()
        };

        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if page.image {
            resources.set("XObject", dictionary! { "Im1" => image_id });
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn test_single_page_text_and_geometry() {
    let pdf = build_pdf(vec![TestPage::text(text_block(72, 720, 12, &["Hello world."]))]);
    let loader = PdfLoader::from_bytes(&pdf).unwrap();

    assert_eq!(loader.page_count(), 1);
    let pages = loader.pages().unwrap();
    let page = &pages[0];

    assert_eq!(page.number, 1);
    assert_eq!(page.dimensions(), (595.0, 842.0));
    assert_eq!(page.text, "Hello world.");
    assert_eq!(page.image_count, 0);

    assert_eq!(page.blocks.len(), 1);
    let bbox = page.blocks[0].bbox.unwrap();
    assert!(approx(bbox.x0, 72.0), "x0 was {}", bbox.x0);
    // Top edge: 842 - (720 + 0.8 * 12)
    assert!(approx(bbox.y0, 112.4), "y0 was {}", bbox.y0);
    // Bottom edge: 842 - (720 - 0.2 * 12)
    assert!(approx(bbox.y1, 124.4), "y1 was {}", bbox.y1);
}

#[test]
fn test_lines_joined_with_newlines() {
    let pdf = build_pdf(vec![TestPage::text(text_block(
        72,
        720,
        12,
        &["Line one", "Line two."],
    ))]);
    let page = PdfLoader::from_bytes(&pdf).unwrap().load_page(1).unwrap();

    assert_eq!(page.text, "Line one\nLine two.");
    assert_eq!(page.blocks.len(), 1);
    assert_eq!(page.blocks[0].lines.len(), 2);
}

#[test]
fn test_image_page() {
    let mut ops = text_block(72, 720, 12, &["A caption-free page with a picture."]);
    ops.extend([
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                100.into(),
                0.into(),
                0.into(),
                50.into(),
                72.into(),
                600.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
        Operation::new("Q", vec![]),
    ]);
    let pdf = build_pdf(vec![TestPage {
        ops,
        image: true,
        broken_contents: false,
    }]);

    let page = PdfLoader::from_bytes(&pdf).unwrap().load_page(1).unwrap();
    assert_eq!(page.image_count, 1);
    assert!(page.has_images());

    let image = page.blocks.iter().find(|b| b.is_image()).unwrap();
    let bbox = image.bbox.unwrap();
    assert!(approx(bbox.x0, 72.0) && approx(bbox.x1, 172.0));
    assert!(approx(bbox.y0, 192.0) && approx(bbox.y1, 242.0));

    let skip_images = FilterConfig::permissive().with_skip_if_image(true);
    assert!(assemble(&[page], &skip_images).is_empty());
}

#[test]
fn test_sentence_across_pages() {
    let pdf = build_pdf(vec![
        TestPage::text(text_block(72, 720, 12, &["This sentence starts on page one"])),
        TestPage::text(text_block(72, 720, 12, &["and ends on page two. Next one."])),
    ]);

    let records = extract_bytes(&pdf, &FilterConfig::permissive()).unwrap();
    assert_eq!(
        records,
        vec![
            SentenceRecord::new(1, "This sentence starts on page one and ends on page two."),
            SentenceRecord::new(2, "Next one."),
        ]
    );
}

#[test]
fn test_header_removal_on_loaded_page() {
    let mut ops = text_block(72, 820, 10, &["Running Header"]);
    ops.extend(text_block(72, 500, 12, &["Body text only."]));
    let pdf = build_pdf(vec![TestPage::text(ops)]);

    let pages = PdfLoader::from_bytes(&pdf).unwrap().pages().unwrap();
    assert_eq!(pages[0].blocks.len(), 2);

    let plain = assemble(&pages, &FilterConfig::permissive());
    assert_eq!(plain, vec![SentenceRecord::new(1, "Running Header Body text only.")]);

    let cleaned = assemble(
        &pages,
        &FilterConfig::permissive().with_header_footer_removal(true),
    );
    assert_eq!(cleaned, vec![SentenceRecord::new(1, "Body text only.")]);
}

#[test]
fn test_page_out_of_range() {
    let pdf = build_pdf(vec![TestPage::text(text_block(72, 720, 12, &["Only page."]))]);
    let loader = PdfLoader::from_bytes(&pdf).unwrap();
    assert!(matches!(
        loader.load_page(3),
        Err(Error::PageOutOfRange(3, 1))
    ));
}

#[test]
fn test_strict_and_lenient_page_failures() {
    let pages = || {
        vec![
            TestPage::text(text_block(72, 720, 12, &["Fine page."])),
            TestPage {
                ops: Vec::new(),
                image: false,
                broken_contents: true,
            },
        ]
    };

    let strict = PdfLoader::from_bytes(&build_pdf(pages())).unwrap();
    assert!(matches!(
        strict.pages(),
        Err(Error::TextExtract { page: 2, .. })
    ));

    let lenient =
        PdfLoader::from_bytes_with_options(&build_pdf(pages()), LoadOptions::new().lenient())
            .unwrap();
    let loaded = lenient.pages().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].text, "Fine page.");
    assert_eq!(loaded[1].number, 2);
    assert!(loaded[1].text.is_empty());
    assert!(loaded[1].blocks.is_empty());
}

#[test]
fn test_from_reader() {
    let pdf = build_pdf(vec![TestPage::text(text_block(72, 720, 12, &["Read me."]))]);
    let loader = PdfLoader::from_reader(std::io::Cursor::new(pdf)).unwrap();
    assert_eq!(loader.version(), "1.5");
    assert_eq!(loader.pages().unwrap()[0].text, "Read me.");
}

#[test]
fn test_open_from_file() {
    let pdf = build_pdf(vec![TestPage::text(text_block(72, 720, 12, &["On disk."]))]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, &pdf).unwrap();

    let records = pagesent::extract_file(file.path(), &FilterConfig::permissive()).unwrap();
    assert_eq!(records, vec![SentenceRecord::new(1, "On disk.")]);
}
