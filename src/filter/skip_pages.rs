//! Parsing of user-supplied skip lists such as `"1,2,5-7"`.

use std::collections::BTreeSet;

/// Highest page a range can expand to.
pub const MAX_SKIP_PAGE: u32 = 100_000;

/// Parse a comma-separated list of page numbers and inclusive ranges.
///
/// Tokens that do not parse, and ranges whose start exceeds their end, are
/// ignored. Whitespace around tokens and range bounds is allowed. Range ends
/// are clamped to [`MAX_SKIP_PAGE`].
///
/// # Example
///
/// ```
/// use pagesent::parse_skip_pages;
///
/// let pages = parse_skip_pages("1,2,5-7, x, 9-8");
/// assert_eq!(pages.into_iter().collect::<Vec<_>>(), vec![1, 2, 5, 6, 7]);
/// ```
pub fn parse_skip_pages(spec: &str) -> BTreeSet<u32> {
    let mut pages = BTreeSet::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((lo, hi)) = part.split_once('-') {
            match (lo.trim().parse::<u32>(), hi.trim().parse::<u32>()) {
                (Ok(lo), Ok(hi)) if lo <= hi => {
                    if hi > MAX_SKIP_PAGE {
                        log::debug!("Clamping skip-page range {:?} to {}", part, MAX_SKIP_PAGE);
                    }
                    pages.extend(lo..=hi.min(MAX_SKIP_PAGE));
                }
                _ => log::debug!("Ignoring skip-page range {:?}", part),
            }
        } else {
            match part.parse::<u32>() {
                Ok(page) => {
                    pages.insert(page);
                }
                Err(_) => log::debug!("Ignoring skip-page token {:?}", part),
            }
        }
    }

    pages
}
