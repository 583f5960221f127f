//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page handed to the sentence pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Plain text of the whole page, line breaks preserved
    pub text: String,

    /// Positioned content blocks on the page
    pub blocks: Vec<ContentBlock>,

    /// Number of image XObjects the page references
    pub image_count: usize,
}

impl Page {
    /// Create a new, empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            text: String::new(),
            blocks: Vec::new(),
            image_count: 0,
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Set the plain text of the page.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a content block.
    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.add_block(block);
        self
    }

    /// Set the embedded image count.
    pub fn with_images(mut self, count: usize) -> Self {
        self.image_count = count;
        self
    }

    /// Add a content block to the page.
    pub fn add_block(&mut self, block: ContentBlock) {
        self.blocks.push(block);
    }

    /// Total page area in square points.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Check if the page has at least one embedded image.
    pub fn has_images(&self) -> bool {
        self.image_count > 0
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// Axis-aligned rectangle in page space.
///
/// The origin is the top-left corner of the page and `y` grows downwards,
/// so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Area, with inverted edges counting as zero extent.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// What a content block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Image,
    Other,
}

/// A positioned block of page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type
    pub kind: BlockKind,

    /// Bounding box, absent when the producer could not place the block
    pub bbox: Option<BoundingBox>,

    /// Lines of text (empty for non-text blocks)
    pub lines: Vec<TextLine>,
}

impl ContentBlock {
    /// Create a text block from lines.
    pub fn text(bbox: Option<BoundingBox>, lines: Vec<TextLine>) -> Self {
        Self {
            kind: BlockKind::Text,
            bbox,
            lines,
        }
    }

    /// Create a text block holding one single-span line per entry.
    pub fn text_lines<S: Into<String>>(
        bbox: BoundingBox,
        lines: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::text(
            Some(bbox),
            lines.into_iter().map(TextLine::from_text).collect(),
        )
    }

    /// Create an image block.
    pub fn image(bbox: Option<BoundingBox>) -> Self {
        Self {
            kind: BlockKind::Image,
            bbox,
            lines: Vec::new(),
        }
    }

    /// Check if this block carries text.
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        self.kind == BlockKind::Image
    }

    /// Trimmed, non-empty span texts in reading order.
    pub fn span_texts(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.text.trim())
            .filter(|text| !text.is_empty())
    }
}

/// A line of text inside a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a line holding a single span.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            spans: vec![TextSpan::new(text)],
        }
    }

    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A run of text with uniform styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,

    /// Font size in points, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl TextSpan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new() {
        let page = Page::new(3, 612.0, 792.0);
        assert_eq!(page.number, 3);
        assert_eq!(page.area(), 612.0 * 792.0);
        assert!(!page.has_images());
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn test_bbox_area_clamps_inverted_edges() {
        let bbox = BoundingBox::new(10.0, 10.0, 5.0, 20.0);
        assert_eq!(bbox.area(), 0.0);

        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(bbox.area(), 200.0);
    }

    #[test]
    fn test_bbox_union() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, -5.0, 20.0, 8.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn test_span_texts_skip_blank_spans() {
        let block = ContentBlock::text(
            None,
            vec![
                TextLine {
                    spans: vec![TextSpan::new("  Hello "), TextSpan::new("   ")],
                },
                TextLine::from_text("world"),
            ],
        );
        let texts: Vec<_> = block.span_texts().collect();
        assert_eq!(texts, vec!["Hello", "world"]);
    }

    #[test]
    fn test_block_kind_serde() {
        let block = ContentBlock::image(None);
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"kind\":\"image\""));
    }
}
