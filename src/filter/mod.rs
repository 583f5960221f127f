//! Page filtering: deciding which pages are noise.

mod config;
mod page_filter;
mod skip_pages;

pub use config::FilterConfig;
pub use page_filter::{
    body_blocks, caption_count, evaluate, should_skip, text_block_area_ratio, SkipReason,
};
pub use skip_pages::{parse_skip_pages, MAX_SKIP_PAGE};
