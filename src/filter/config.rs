//! Page filter thresholds.

use std::collections::BTreeSet;

/// Thresholds deciding which pages are noise.
///
/// All ratios are fractions of the page height (header/footer) or page area
/// (text ratio). Build with the `with_*` methods:
///
/// ```
/// use pagesent::FilterConfig;
///
/// let config = FilterConfig::new()
///     .with_skip_pages([1, 2])
///     .with_min_text_len(30)
///     .with_header_footer_removal(true);
/// assert!(config.skip_pages.contains(&2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Pages (1-indexed) that are always skipped
    pub skip_pages: BTreeSet<u32>,

    /// Minimum number of characters in the page's trimmed text
    pub min_text_len: usize,

    /// Table/figure caption count at which a page is skipped
    pub table_threshold: usize,

    /// Skip any page that references an image
    pub skip_if_image: bool,

    /// Minimum share of the page area covered by text blocks
    pub min_text_ratio: f32,

    /// Extract text from blocks outside the header/footer bands only
    pub remove_header_footer: bool,

    /// Height of the header band as a fraction of page height
    pub header_ratio: f32,

    /// Height of the footer band as a fraction of page height
    pub footer_ratio: f32,
}

impl FilterConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that never skips a page.
    pub fn permissive() -> Self {
        Self {
            min_text_len: 0,
            table_threshold: usize::MAX,
            min_text_ratio: 0.0,
            ..Self::default()
        }
    }

    /// Set the pages that are always skipped.
    pub fn with_skip_pages(mut self, pages: impl IntoIterator<Item = u32>) -> Self {
        self.skip_pages = pages.into_iter().collect();
        self
    }

    /// Set the minimum trimmed text length.
    pub fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    /// Set the caption count threshold.
    pub fn with_table_threshold(mut self, threshold: usize) -> Self {
        self.table_threshold = threshold;
        self
    }

    /// Enable or disable skipping pages with images.
    pub fn with_skip_if_image(mut self, skip: bool) -> Self {
        self.skip_if_image = skip;
        self
    }

    /// Set the minimum text-area ratio.
    pub fn with_min_text_ratio(mut self, ratio: f32) -> Self {
        self.min_text_ratio = ratio;
        self
    }

    /// Enable or disable header/footer removal during extraction.
    pub fn with_header_footer_removal(mut self, remove: bool) -> Self {
        self.remove_header_footer = remove;
        self
    }

    /// Set the header band ratio (clamped to 0.0..=1.0).
    pub fn with_header_ratio(mut self, ratio: f32) -> Self {
        self.header_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the footer band ratio (clamped to 0.0..=1.0).
    pub fn with_footer_ratio(mut self, ratio: f32) -> Self {
        self.footer_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_pages: BTreeSet::new(),
            min_text_len: 50,
            table_threshold: 3,
            skip_if_image: false,
            min_text_ratio: 0.05,
            remove_header_footer: false,
            header_ratio: 0.05,
            footer_ratio: 0.05,
        }
    }
}
