//! Per-page include/skip decision.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::model::{ContentBlock, Page};

use super::FilterConfig;

/// Why a page was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Listed in the force-skip set
    ForcedSkip,
    /// Too little text on the page
    TooShort,
    /// Too many table/figure captions
    CaptionHeavy,
    /// Page contains an image and images are excluded
    HasImage,
    /// Text blocks cover too little of the page
    LowTextRatio,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ForcedSkip => "forced skip",
            SkipReason::TooShort => "too little text",
            SkipReason::CaptionHeavy => "table/figure captions",
            SkipReason::HasImage => "contains image",
            SkipReason::LowTextRatio => "low text area",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether a page is noise.
pub fn should_skip(page: &Page, page_number: u32, config: &FilterConfig) -> bool {
    evaluate(page, page_number, config).is_some()
}

/// Run the five checks in order and report the first one that fires.
///
/// The checks are: force-skip set, trimmed text length, caption count,
/// image presence (when enabled) and text-area ratio. Text length and
/// captions always look at the full page text, whatever the header/footer
/// setting; the area ratio always honours the header/footer bands.
pub fn evaluate(page: &Page, page_number: u32, config: &FilterConfig) -> Option<SkipReason> {
    if config.skip_pages.contains(&page_number) {
        return Some(SkipReason::ForcedSkip);
    }

    if page.text.trim().chars().count() < config.min_text_len {
        return Some(SkipReason::TooShort);
    }

    if caption_count(&page.text) >= config.table_threshold {
        return Some(SkipReason::CaptionHeavy);
    }

    if config.skip_if_image && page.has_images() {
        return Some(SkipReason::HasImage);
    }

    let ratio = text_block_area_ratio(page, config.header_ratio, config.footer_ratio);
    if ratio < config.min_text_ratio {
        return Some(SkipReason::LowTextRatio);
    }

    None
}

/// Count `표 N` plus case-insensitive `Table N` / `Figure N` captions.
pub fn caption_count(text: &str) -> usize {
    static KOREAN: OnceLock<Regex> = OnceLock::new();
    static ENGLISH: OnceLock<Regex> = OnceLock::new();

    let korean = KOREAN.get_or_init(|| Regex::new(r"표\s*\d+").expect("valid caption pattern"));
    let english = ENGLISH
        .get_or_init(|| Regex::new(r"(?i)(?:table|figure)\s*\d+").expect("valid caption pattern"));

    korean.find_iter(text).count() + english.find_iter(text).count()
}

/// Blocks that are placed and not entirely inside the header or footer band.
///
/// A block is a header when its bottom edge is above `height * header_ratio`
/// and a footer when its top edge is below `height * (1 - footer_ratio)`.
/// Blocks without a bounding box are dropped.
pub fn body_blocks(
    page: &Page,
    header_ratio: f32,
    footer_ratio: f32,
) -> impl Iterator<Item = &ContentBlock> {
    let header_limit = page.height * header_ratio;
    let footer_limit = page.height * (1.0 - footer_ratio);

    page.blocks.iter().filter(move |block| match block.bbox {
        Some(bbox) => bbox.y1 >= header_limit && bbox.y0 <= footer_limit,
        None => false,
    })
}

/// Share of the page area covered by text blocks outside the header/footer
/// bands. Returns 0.0 for pages without a positive area.
pub fn text_block_area_ratio(page: &Page, header_ratio: f32, footer_ratio: f32) -> f32 {
    let page_area = page.area();
    if page_area <= 0.0 {
        return 0.0;
    }

    let text_area: f32 = body_blocks(page, header_ratio, footer_ratio)
        .filter(|block| block.is_text())
        .filter_map(|block| block.bbox)
        .map(|bbox| bbox.area())
        .sum();

    text_area / page_area
}
