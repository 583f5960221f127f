//! Error types for pagesent.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pagesent operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the I/O boundary.
///
/// The sentence pipeline itself never fails; these come from opening and
/// reading the PDF, and from writing exports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error decoding a page's content stream.
    #[error("Text extraction error on page {page}: {message}")]
    TextExtract { page: u32, message: String },

    /// Error writing sentence exports.
    #[error("Export error ({}): {message}", .path.display())]
    Export { path: PathBuf, message: String },
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
