//! # pagesent
//!
//! Page-aware sentence extraction from PDF documents.
//!
//! Pages are filtered (forced skips, near-empty pages, caption-heavy pages,
//! image pages, sparse layouts), their text is normalized and split into
//! sentences, and sentences broken across a page turn are reassembled and
//! tagged with the page they started on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagesent::{extract_file, FilterConfig};
//!
//! fn main() -> pagesent::Result<()> {
//!     let config = FilterConfig::default().with_skip_pages([1, 2]);
//!     for record in extract_file("document.pdf", &config)? {
//!         println!("p.{} {}", record.start_page, record.sentence);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page filtering**: skip lists, minimum text length, caption counts,
//!   image pages, text-area ratio with header/footer bands
//! - **Sentence assembly**: sentences spanning pages come out whole
//! - **CJK support**: Korean, Chinese, Japanese punctuation and spacing
//! - **Exports**: one file per sentence, CSV or JSON

pub mod assemble;
pub mod detect;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
pub mod text;

// Re-export commonly used types
pub use assemble::{assemble, assemble_with_report, AssembleReport, Assembler, Fragment};
pub use detect::{is_pdf_bytes, pdf_version, pdf_version_from_path};
pub use error::{Error, Result};
pub use export::{export, ExportSummary, JsonFormat, OutputFormat};
pub use filter::{parse_skip_pages, FilterConfig, SkipReason};
pub use model::{BoundingBox, ContentBlock, Page, SentenceRecord};
pub use parser::{ErrorMode, LoadOptions, PdfLoader};

use std::io::Read;
use std::path::Path;

/// Extract sentence records from a PDF file.
///
/// # Example
///
/// ```no_run
/// use pagesent::{extract_file, FilterConfig};
///
/// let records = extract_file("document.pdf", &FilterConfig::default()).unwrap();
/// println!("{} sentences", records.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, config: &FilterConfig) -> Result<Vec<SentenceRecord>> {
    extract_file_with_options(path, config, LoadOptions::default())
}

/// Extract sentence records from a PDF file with custom load options.
///
/// # Example
///
/// ```no_run
/// use pagesent::{extract_file_with_options, FilterConfig, LoadOptions};
///
/// let options = LoadOptions::new().lenient().with_unicode_normalization(true);
/// let records =
///     extract_file_with_options("document.pdf", &FilterConfig::default(), options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    config: &FilterConfig,
    options: LoadOptions,
) -> Result<Vec<SentenceRecord>> {
    let loader = PdfLoader::open_with_options(path, options)?;
    Ok(assemble(&loader.pages()?, config))
}

/// Extract sentence records from PDF bytes.
///
/// # Example
///
/// ```no_run
/// use pagesent::{extract_bytes, FilterConfig};
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let records = extract_bytes(&data, &FilterConfig::default()).unwrap();
/// ```
pub fn extract_bytes(data: &[u8], config: &FilterConfig) -> Result<Vec<SentenceRecord>> {
    let loader = PdfLoader::from_bytes(data)?;
    Ok(assemble(&loader.pages()?, config))
}

/// Extract sentence records from a reader.
pub fn extract_reader<R: Read>(reader: R, config: &FilterConfig) -> Result<Vec<SentenceRecord>> {
    let loader = PdfLoader::from_reader(reader)?;
    Ok(assemble(&loader.pages()?, config))
}

/// Builder tying loading, filtering and export together.
///
/// # Example
///
/// ```no_run
/// use pagesent::{OutputFormat, Pagesent};
///
/// let extraction = Pagesent::new()
///     .with_skip_pages("1-2")
///     .with_header_footer_removal()
///     .lenient()
///     .extract("document.pdf")?;
/// extraction.export("out", OutputFormat::Csv)?;
/// # Ok::<(), pagesent::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pagesent {
    load_options: LoadOptions,
    filter: FilterConfig,
}

impl Pagesent {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter configuration.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Force-skip pages given as `"1,2,5-7"`.
    pub fn with_skip_pages(mut self, spec: &str) -> Self {
        self.filter = self.filter.with_skip_pages(parse_skip_pages(spec));
        self
    }

    /// Drop header and footer bands before reading page text.
    pub fn with_header_footer_removal(mut self) -> Self {
        self.filter = self.filter.with_header_footer_removal(true);
        self
    }

    /// Enable lenient loading mode.
    pub fn lenient(mut self) -> Self {
        self.load_options = self.load_options.lenient();
        self
    }

    /// Apply NFC normalization to page text.
    pub fn with_unicode_normalization(mut self) -> Self {
        self.load_options = self.load_options.with_unicode_normalization(true);
        self
    }

    /// Load and assemble a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<Extraction> {
        let loader = PdfLoader::open_with_options(path, self.load_options)?;
        Ok(run(&loader.pages()?, &self.filter))
    }

    /// Load and assemble a PDF from bytes.
    pub fn extract_bytes(self, data: &[u8]) -> Result<Extraction> {
        let loader = PdfLoader::from_bytes_with_options(data, self.load_options)?;
        Ok(run(&loader.pages()?, &self.filter))
    }
}

fn run(pages: &[Page], config: &FilterConfig) -> Extraction {
    let (records, report) = assemble_with_report(pages, config);
    Extraction { records, report }
}

/// Records and counters from one extraction run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<SentenceRecord>,
    pub report: AssembleReport,
}

impl Extraction {
    /// Write the records into `dir`.
    pub fn export<P: AsRef<Path>>(&self, dir: P, format: OutputFormat) -> Result<ExportSummary> {
        export::export(&self.records, dir, format)
    }
}
