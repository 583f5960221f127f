//! Page-spanning sentence assembly.
//!
//! The assembler walks pages in order. Included pages are normalized and
//! split into sentences; a trailing piece without terminal punctuation is held
//! back as a [`Fragment`] and prepended to the next *included* page, so a
//! sentence broken by a page turn (or by skipped pages in between) comes out
//! whole and tagged with the page it started on.
//!
//! # Example
//!
//! ```
//! use pagesent::{assemble, FilterConfig, Page, SentenceRecord};
//!
//! let pages = vec![
//!     Page::letter(5).with_text("This is a sentence that wraps onto the next"),
//!     Page::letter(6).with_text("page and ends here. Another full sentence."),
//! ];
//! let records = assemble(&pages, &FilterConfig::permissive());
//!
//! assert_eq!(
//!     records,
//!     vec![
//!         SentenceRecord::new(5, "This is a sentence that wraps onto the next page and ends here."),
//!         SentenceRecord::new(6, "Another full sentence."),
//!     ]
//! );
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::{self, FilterConfig, SkipReason};
use crate::model::{Page, SentenceRecord};
use crate::text::{ends_with_terminal, normalize_line_breaks, split_sentences};

/// An unterminated sentence tail waiting for the next included page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// Text collected so far, trimmed
    pub text: String,
    /// Page the fragment started on
    pub page: u32,
}

/// Counters collected over one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssembleReport {
    /// Pages handed to the assembler
    pub pages_seen: u32,

    /// Pages that contributed text
    pub pages_included: u32,

    /// Skipped pages per reason
    pub pages_skipped: BTreeMap<SkipReason, u32>,

    /// Records emitted
    pub sentences: u32,

    /// Records whose start page precedes the page that completed them
    pub carried_sentences: u32,

    /// Tail left unterminated at the end of the document
    pub dropped_fragment: Option<Fragment>,
}

impl AssembleReport {
    /// Total number of skipped pages.
    pub fn skipped_total(&self) -> u32 {
        self.pages_skipped.values().sum()
    }

    fn record_skip(&mut self, reason: SkipReason) {
        *self.pages_skipped.entry(reason).or_insert(0) += 1;
    }
}

/// Incremental page-spanning assembler.
///
/// Feed pages in increasing order with [`push_page`](Self::push_page); each
/// call returns the sentences completed on that page. Stopping early is safe
/// at any page boundary.
#[derive(Debug, Clone)]
pub struct Assembler {
    config: FilterConfig,
    fragment: Option<Fragment>,
    report: AssembleReport,
}

impl Assembler {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            fragment: None,
            report: AssembleReport::default(),
        }
    }

    /// The filter configuration in use.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The fragment currently waiting for more text, if any.
    pub fn pending(&self) -> Option<&Fragment> {
        self.fragment.as_ref()
    }

    /// Counters so far.
    pub fn report(&self) -> &AssembleReport {
        &self.report
    }

    /// Process one page and return the sentences it completes.
    ///
    /// A skipped page leaves any pending fragment untouched.
    pub fn push_page(&mut self, page: &Page) -> Vec<SentenceRecord> {
        let page_number = page.number;
        self.report.pages_seen += 1;

        if let Some(reason) = filter::evaluate(page, page_number, &self.config) {
            log::debug!("Skipping page {}: {}", page_number, reason);
            self.report.record_skip(reason);
            return Vec::new();
        }
        self.report.pages_included += 1;

        let raw = page_text(page, &self.config);
        let normalized = normalize_line_breaks(&raw);

        let carried = self.fragment.take();
        let (text, origin_page) = match &carried {
            Some(fragment) => (format!("{} {}", fragment.text, normalized), fragment.page),
            None => (normalized, page_number),
        };

        let mut sentences = split_sentences(&text);

        if sentences.last().is_some_and(|last| !ends_with_terminal(last)) {
            // The tail holds the carried text only when nothing split it off.
            let tail_page = if carried.is_some() && sentences.len() == 1 {
                origin_page
            } else {
                page_number
            };
            if let Some(tail) = sentences.pop() {
                log::debug!(
                    "Carrying unterminated text from page {} past page {}",
                    tail_page,
                    page_number
                );
                self.fragment = Some(Fragment {
                    text: tail,
                    page: tail_page,
                });
            }
        }

        // Only the first sentence can contain the carried fragment.
        let records: Vec<SentenceRecord> = sentences
            .into_iter()
            .enumerate()
            .map(|(i, sentence)| {
                let start_page = if i == 0 && carried.is_some() {
                    origin_page
                } else {
                    page_number
                };
                SentenceRecord::new(start_page, sentence)
            })
            .collect();

        self.report.sentences += records.len() as u32;
        self.report.carried_sentences += records
            .iter()
            .filter(|r| r.start_page != page_number)
            .count() as u32;

        records
    }

    /// End the walk. A pending fragment is dropped and noted in the report.
    pub fn finish(mut self) -> AssembleReport {
        if let Some(fragment) = self.fragment.take() {
            log::debug!(
                "Dropping unterminated text from page {} at end of document",
                fragment.page
            );
            self.report.dropped_fragment = Some(fragment);
        }
        self.report
    }
}

/// Assemble sentence records from pages given in increasing page order.
pub fn assemble(pages: &[Page], config: &FilterConfig) -> Vec<SentenceRecord> {
    assemble_with_report(pages, config).0
}

/// Like [`assemble`], also returning the run's counters.
pub fn assemble_with_report(
    pages: &[Page],
    config: &FilterConfig,
) -> (Vec<SentenceRecord>, AssembleReport) {
    let mut assembler = Assembler::new(config.clone());
    let mut records = Vec::new();

    for page in pages {
        records.extend(assembler.push_page(page));
    }

    let report = assembler.finish();
    log::info!(
        "Assembled {} sentences from {} of {} pages",
        report.sentences,
        report.pages_included,
        report.pages_seen
    );
    (records, report)
}

/// The text a page contributes before normalization.
///
/// With header/footer removal enabled this is the trimmed span text of text
/// blocks outside the bands, one span per line; otherwise the page's full
/// plain text.
pub fn page_text<'a>(page: &'a Page, config: &FilterConfig) -> Cow<'a, str> {
    if !config.remove_header_footer {
        return Cow::Borrowed(&page.text);
    }

    let lines: Vec<&str> = filter::body_blocks(page, config.header_ratio, config.footer_ratio)
        .filter(|block| block.is_text())
        .flat_map(|block| block.span_texts())
        .collect();
    Cow::Owned(lines.join("\n"))
}
