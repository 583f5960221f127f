//! Positioned content extraction from page content streams.
//!
//! The scanner walks a decoded content stream keeping the graphics and text
//! matrices, records every shown string with its baseline position and
//! effective font size, and every painted image XObject with its placement.
//! Spans are then grouped into lines (shared baseline) and lines into blocks
//! (small vertical gaps), in content-stream order. Glyph widths are not read
//! from the fonts; span widths are estimated from character counts, which is
//! enough for block bounding boxes.

use std::collections::{BTreeMap, HashMap};

use lopdf::content::Operation;
use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::model::{BoundingBox, ContentBlock, TextLine, TextSpan};

use super::backend::{decode_text_simple, get_number, PageBox, XObjectKind};

/// TJ adjustments larger than this (in thousandths of an em) read as a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A shown string in device space (PDF user space after the CTM).
#[derive(Debug, Clone)]
pub struct PositionedSpan {
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl PositionedSpan {
    fn top(&self) -> f32 {
        self.y + self.font_size * 0.8 // Approximate ascender
    }

    fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2 // Approximate descender
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Device-space rectangle of a painted image: (x0, y0, x1, y1), y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Everything the scanner found on one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub spans: Vec<PositionedSpan>,
    pub images: Vec<ImagePlacement>,
}

/// 2D affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(ops: &[Object]) -> Option<Matrix> {
        let n: Vec<f32> = ops.iter().take(6).filter_map(get_number).collect();
        match n.as_slice() {
            &[a, b, c, d, e, f] => Some(Matrix { a, b, c, d, e, f }),
            _ => None,
        }
    }

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Walks one page's content stream.
pub struct ContentScanner<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    xobjects: &'a HashMap<Vec<u8>, XObjectKind>,
}

impl<'a> ContentScanner<'a> {
    pub fn new(
        doc: &'a LopdfDocument,
        fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
        xobjects: &'a HashMap<Vec<u8>, XObjectKind>,
    ) -> Self {
        Self {
            doc,
            fonts,
            xobjects,
        }
    }

    /// Collect positioned spans and image placements.
    pub fn scan(&self, operations: &[Operation]) -> PageLayout {
        let mut layout = PageLayout::default();

        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut tm = Matrix::IDENTITY;
        let mut tlm = Matrix::IDENTITY;
        let mut font_size: f32 = 12.0;
        let mut leading: f32 = 0.0;
        let mut h_scale: f32 = 1.0;
        let mut encoding = None;

        for op in operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    tm = Matrix::IDENTITY;
                    tlm = Matrix::IDENTITY;
                }
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        encoding = self
                            .fonts
                            .get(name)
                            .and_then(|font| font.get_font_encoding(self.doc).ok());
                    }
                    font_size = operands.get(1).and_then(get_number).unwrap_or(12.0);
                }
                "TL" => leading = operands.first().and_then(get_number).unwrap_or(0.0),
                "Tz" => {
                    h_scale = operands.first().and_then(get_number).unwrap_or(100.0) / 100.0;
                }
                "Td" | "TD" => {
                    let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                    if op.operator == "TD" {
                        leading = -ty;
                    }
                    tlm = Matrix::translation(tx, ty).then(&tlm);
                    tm = tlm;
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -leading).then(&tlm);
                    tm = tlm;
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        tlm = Matrix::translation(0.0, -leading).then(&tlm);
                        tm = tlm;
                    }

                    let decode = |bytes: &[u8]| match &encoding {
                        Some(enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_simple(bytes)),
                        None => decode_text_simple(bytes),
                    };

                    let (text, adjust) = match op.operator.as_str() {
                        "TJ" => match operands.first() {
                            Some(Object::Array(items)) => shown_array(items, decode),
                            _ => (String::new(), 0.0),
                        },
                        "\"" => match operands.get(2) {
                            Some(Object::String(bytes, _)) => (decode(bytes), 0.0),
                            _ => (String::new(), 0.0),
                        },
                        _ => match operands.first() {
                            Some(Object::String(bytes, _)) => (decode(bytes), 0.0),
                            _ => (String::new(), 0.0),
                        },
                    };

                    let advance = (estimate_advance(&text) * font_size - adjust / 1000.0 * font_size)
                        * h_scale;
                    let trm = tm.then(&ctm);

                    if !text.trim().is_empty() {
                        let (x, y) = trm.apply(0.0, 0.0);
                        layout.spans.push(PositionedSpan {
                            text,
                            x,
                            y,
                            width: advance.max(0.0) * trm.horizontal_scale(),
                            font_size: font_size * trm.vertical_scale(),
                        });
                    }

                    tm = Matrix::translation(advance, 0.0).then(&tm);
                }
                "Do" => {
                    let is_image = match operands.first() {
                        Some(Object::Name(name)) => {
                            self.xobjects.get(name) == Some(&XObjectKind::Image)
                        }
                        _ => false,
                    };
                    if is_image {
                        layout.images.push(unit_square_placement(&ctm));
                    }
                }
                _ => {}
            }
        }

        layout
    }
}

/// Decode a TJ array. Returns the text and the summed numeric adjustment.
///
/// Large negative adjustments (rightward moves) become spaces, except after
/// characters of scripts written without spaces.
fn shown_array(items: &[Object], decode: impl Fn(&[u8]) -> String) -> (String, f32) {
    let mut combined = String::new();
    let mut adjust = 0.0;

    for item in items {
        if let Object::String(bytes, _) = item {
            combined.push_str(&decode(bytes));
            continue;
        }
        let Some(n) = get_number(item) else {
            continue;
        };
        adjust += n;
        if -n > TJ_SPACE_THRESHOLD
            && !combined.ends_with(' ')
            && !combined.ends_with('\u{00A0}')
            && combined
                .chars()
                .last()
                .is_some_and(|c| !is_spaceless_script_char(c))
        {
            combined.push(' ');
        }
    }

    (combined, adjust)
}

/// Advance width in ems: full width for CJK and Hangul, half otherwise.
fn estimate_advance(text: &str) -> f32 {
    text.chars()
        .map(|c| if is_wide_char(c) { 1.0 } else { 0.5 })
        .sum()
}

fn unit_square_placement(ctm: &Matrix) -> ImagePlacement {
    let corners = [
        ctm.apply(0.0, 0.0),
        ctm.apply(1.0, 0.0),
        ctm.apply(0.0, 1.0),
        ctm.apply(1.0, 1.0),
    ];
    let (mut x0, mut y0) = corners[0];
    let (mut x1, mut y1) = corners[0];
    for (x, y) in corners {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    ImagePlacement { x0, y0, x1, y1 }
}

/// A line being assembled from spans.
struct LineBuilder {
    spans: Vec<PositionedSpan>,
    baseline: f32,
    font_size: f32,
}

impl LineBuilder {
    fn new(span: PositionedSpan) -> Self {
        Self {
            baseline: span.y,
            font_size: span.font_size,
            spans: vec![span],
        }
    }

    fn accepts(&self, span: &PositionedSpan) -> bool {
        let tolerance = self.font_size.max(span.font_size) * 0.5;
        (span.y - self.baseline).abs() <= tolerance
    }

    fn left(&self) -> f32 {
        self.spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min)
    }

    fn right(&self) -> f32 {
        self.spans
            .iter()
            .map(PositionedSpan::right)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(PositionedSpan::top)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn bottom(&self) -> f32 {
        self.spans
            .iter()
            .map(PositionedSpan::bottom)
            .fold(f32::INFINITY, f32::min)
    }

    /// Joined span text with gap-based spacing.
    ///
    /// Spans are ordered by x; a space is inserted when the horizontal gap
    /// is wider than a fraction of the font size, except between two
    /// characters of scripts written without spaces.
    fn text(&mut self) -> String {
        self.spans
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let mut result = String::new();
        let mut prev: Option<&PositionedSpan> = None;

        for span in &self.spans {
            if let Some(prev) = prev {
                let gap = span.x - prev.right();
                let threshold = span.font_size * 0.15;
                let prev_spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char);
                let curr_spaceless = span.text.chars().next().is_some_and(is_spaceless_script_char);
                let has_space = prev.text.ends_with(char::is_whitespace)
                    || span.text.starts_with(char::is_whitespace);

                if gap > threshold && !(prev_spaceless && curr_spaceless) && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
            prev = Some(span);
        }

        result
    }
}

impl PageLayout {
    /// Group spans into text blocks and add image blocks, converting to
    /// top-left-origin page coordinates.
    pub fn into_blocks(self, page_box: &PageBox) -> Vec<ContentBlock> {
        let to_page = |x0: f32, bottom: f32, x1: f32, top: f32| {
            BoundingBox::new(
                x0 - page_box.llx,
                page_box.ury - top,
                x1 - page_box.llx,
                page_box.ury - bottom,
            )
        };

        let mut lines: Vec<LineBuilder> = Vec::new();
        for span in self.spans {
            match lines.last_mut() {
                Some(line) if line.accepts(&span) => line.spans.push(span),
                _ => lines.push(LineBuilder::new(span)),
            }
        }

        let mut blocks = Vec::new();
        let mut current: Vec<LineBuilder> = Vec::new();

        for line in lines {
            let starts_block = current.last().is_some_and(|prev| {
                let drop = prev.baseline - line.baseline;
                let size = prev.font_size.max(line.font_size);
                // Moving up, or a gap wider than ~one blank line.
                drop < -size * 0.5 || drop > size * 2.0
            });
            if starts_block {
                blocks.push(finish_block(std::mem::take(&mut current), &to_page));
            }
            current.push(line);
        }
        if !current.is_empty() {
            blocks.push(finish_block(current, &to_page));
        }

        blocks.extend(
            self.images
                .iter()
                .map(|img| ContentBlock::image(Some(to_page(img.x0, img.y0, img.x1, img.y1)))),
        );

        blocks
    }
}

fn finish_block(
    lines: Vec<LineBuilder>,
    to_page: &impl Fn(f32, f32, f32, f32) -> BoundingBox,
) -> ContentBlock {
    let mut bbox: Option<BoundingBox> = None;
    let mut text_lines = Vec::with_capacity(lines.len());

    for mut line in lines {
        let line_box = to_page(line.left(), line.bottom(), line.right(), line.top());
        bbox = Some(match bbox {
            Some(b) => b.union(&line_box),
            None => line_box,
        });
        text_lines.push(TextLine {
            spans: vec![TextSpan {
                text: line.text(),
                font_size: Some(line.font_size),
            }],
        });
    }

    ContentBlock::text(bbox, text_lines)
}

/// Scripts written without spaces between words (Chinese, Japanese).
///
/// Hangul is not included: Korean uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        // Extensions B-F
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}

fn is_wide_char(c: char) -> bool {
    let code = c as u32;
    is_spaceless_script_char(c)
        // Hangul syllables and jamo
        || (0xAC00..=0xD7AF).contains(&code)
        || (0x1100..=0x11FF).contains(&code)
        // Full-width forms
        || (0xFF00..=0xFFEF).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32) -> PositionedSpan {
        PositionedSpan {
            text: text.to_string(),
            x,
            y,
            width: estimate_advance(text) * size,
            font_size: size,
        }
    }

    fn scan(ops: Vec<Operation>) -> PageLayout {
        let doc = LopdfDocument::with_version("1.5");
        let fonts = BTreeMap::new();
        let mut xobjects = HashMap::new();
        xobjects.insert(b"Im1".to_vec(), XObjectKind::Image);
        xobjects.insert(b"Fm1".to_vec(), XObjectKind::Form);
        ContentScanner::new(&doc, &fonts, &xobjects).scan(&ops)
    }

    #[test]
    fn test_matrix_then() {
        let scale = Matrix {
            a: 2.0,
            d: 2.0,
            ..Matrix::IDENTITY
        };
        let m = Matrix::translation(10.0, 5.0).then(&scale);
        assert_eq!(m.apply(0.0, 0.0), (20.0, 10.0));
        assert_eq!(m.vertical_scale(), 2.0);
    }

    #[test]
    fn test_scan_positions_and_leading() {
        let layout = scan(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("First line")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("Second line")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(layout.spans.len(), 2);
        assert_eq!(layout.spans[0].text, "First line");
        assert_eq!((layout.spans[0].x, layout.spans[0].y), (72.0, 700.0));
        assert_eq!((layout.spans[1].x, layout.spans[1].y), (72.0, 686.0));
        assert_eq!(layout.spans[1].font_size, 10.0);
    }

    #[test]
    fn test_scan_applies_ctm() {
        let layout = scan(vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![2.into(), 0.into(), 0.into(), 2.into(), 0.into(), 0.into()],
            ),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 6.into()]),
            Operation::new("Td", vec![10.into(), 20.into()]),
            Operation::new("Tj", vec![Object::string_literal("Scaled")]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![10.into(), 20.into()]),
            Operation::new("Tj", vec![Object::string_literal("Plain")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!((layout.spans[0].x, layout.spans[0].y), (20.0, 40.0));
        assert_eq!(layout.spans[0].font_size, 12.0);
        assert_eq!((layout.spans[1].x, layout.spans[1].y), (10.0, 20.0));
    }

    #[test]
    fn test_scan_tj_array_spacing() {
        let layout = scan(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Hello"),
                    Object::Integer(-250),
                    Object::string_literal("world"),
                    Object::Integer(-30),
                    Object::string_literal("!"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(layout.spans[0].text, "Hello world!");
    }

    #[test]
    fn test_scan_images_only_for_image_xobjects() {
        let layout = scan(vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    200.into(),
                    0.into(),
                    0.into(),
                    100.into(),
                    50.into(),
                    300.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Do", vec![Object::Name(b"Fm1".to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        assert_eq!(
            layout.images,
            vec![ImagePlacement {
                x0: 50.0,
                y0: 300.0,
                x1: 250.0,
                y1: 400.0
            }]
        );
    }

    #[test]
    fn test_line_text_spacing() {
        let mut line = LineBuilder::new(span("world", 40.0, 100.0, 10.0));
        line.spans.push(span("Hello", 0.0, 100.0, 10.0));
        assert_eq!(line.text(), "Hello world");

        let mut cjk = LineBuilder::new(span("日本", 0.0, 100.0, 10.0));
        cjk.spans.push(span("語", 25.0, 100.0, 10.0));
        assert_eq!(cjk.text(), "日本語");
    }

    #[test]
    fn test_into_blocks_groups_and_flips() {
        let page_box = PageBox::LETTER;
        let layout = PageLayout {
            spans: vec![
                span("Running header", 72.0, 770.0, 8.0),
                span("Body line one", 72.0, 600.0, 10.0),
                span("continues", 150.0, 600.0, 10.0),
                span("Body line two.", 72.0, 588.0, 10.0),
            ],
            images: vec![ImagePlacement {
                x0: 100.0,
                y0: 100.0,
                x1: 200.0,
                y1: 150.0,
            }],
        };

        let blocks = layout.into_blocks(&page_box);
        assert_eq!(blocks.len(), 3);

        let header = &blocks[0];
        assert!(header.is_text());
        let bbox = header.bbox.unwrap();
        assert!(bbox.y1 < 30.0, "header bottom edge was {}", bbox.y1);

        let body = &blocks[1];
        assert_eq!(body.lines.len(), 2);
        assert_eq!(body.lines[0].text(), "Body line one continues");
        assert_eq!(body.lines[1].text(), "Body line two.");

        let image = &blocks[2];
        assert!(image.is_image());
        assert_eq!(
            image.bbox,
            Some(BoundingBox::new(100.0, 642.0, 200.0, 692.0))
        );
    }

    #[test]
    fn test_estimate_advance() {
        assert_eq!(estimate_advance("ab"), 1.0);
        assert_eq!(estimate_advance("한국"), 2.0);
    }
}
