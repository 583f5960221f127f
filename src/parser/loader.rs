//! PDF loading using lopdf.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::pdf_version_from_path;
use crate::error::{Error, Result};
use crate::model::{ContentBlock, Page};
use crate::text::normalize_unicode;

use super::backend::{self, XObjectKind};
use super::layout::ContentScanner;
use super::options::{ErrorMode, LoadOptions};

/// Turns a PDF document into [`Page`]s.
pub struct PdfLoader {
    doc: LopdfDocument,
    options: LoadOptions,
}

impl PdfLoader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        pdf_version_from_path(path)?;

        let doc = LopdfDocument::load(path)?;
        Self::with_document(doc, options)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, LoadOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: LoadOptions) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::with_document(doc, options)
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, LoadOptions::default())
    }

    /// Load a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: LoadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn with_document(doc: LopdfDocument, options: LoadOptions) -> Result<Self> {
        // Decryption is not supported; text from encrypted streams is noise.
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc, options })
    }

    /// The options this loader was created with.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// PDF version from the file header, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Load every page, in order.
    pub fn pages(&self) -> Result<Vec<Page>> {
        self.iter_pages().collect()
    }

    /// Load pages lazily, in order.
    ///
    /// Each page is decoded only when the iterator reaches it, so a caller
    /// can stop early or report progress between pages.
    pub fn iter_pages(&self) -> impl Iterator<Item = Result<Page>> + '_ {
        self.doc
            .get_pages()
            .into_iter()
            .map(move |(number, page_id)| self.load_page_by_id(number, page_id))
    }

    /// Load a single page by its 1-based number.
    pub fn load_page(&self, number: u32) -> Result<Page> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, pages.len() as u32))?;
        self.load_page_by_id(number, page_id)
    }

    fn load_page_by_id(&self, number: u32, page_id: ObjectId) -> Result<Page> {
        let page_box = backend::page_box(&self.doc, page_id);
        let xobjects = backend::page_xobjects(&self.doc, page_id);
        let image_count = xobjects
            .values()
            .filter(|kind| **kind == XObjectKind::Image)
            .count();

        let mut page = Page::new(number, page_box.width(), page_box.height()).with_images(image_count);

        match self.page_blocks(number, page_id, &xobjects, &page_box) {
            Ok(blocks) => page.blocks = blocks,
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", number, e);
                page.text = self.fallback_text(number);
                return Ok(page);
            }
        }

        if self.options.normalize_unicode {
            for span in page
                .blocks
                .iter_mut()
                .flat_map(|b| b.lines.iter_mut())
                .flat_map(|l| l.spans.iter_mut())
            {
                span.text = normalize_unicode(&span.text);
            }
        }

        page.text = block_text(&page.blocks);
        if page.text.trim().is_empty() {
            page.text = self.fallback_text(number);
        }

        Ok(page)
    }

    /// lopdf's own extractor, which sometimes copes with streams the walk cannot.
    fn fallback_text(&self, number: u32) -> String {
        let text = self.doc.extract_text(&[number]).unwrap_or_default();
        let text = text.trim();
        if self.options.normalize_unicode {
            normalize_unicode(text)
        } else {
            text.to_string()
        }
    }

    fn page_blocks(
        &self,
        number: u32,
        page_id: ObjectId,
        xobjects: &HashMap<Vec<u8>, XObjectKind>,
        page_box: &backend::PageBox,
    ) -> Result<Vec<ContentBlock>> {
        let text_error = |message: String| Error::TextExtract {
            page: number,
            message,
        };

        let data = backend::page_content(&self.doc, page_id)
            .map_err(|e| text_error(e.to_string()))?;
        let content = Content::decode(&data).map_err(|e| text_error(e.to_string()))?;
        let fonts =
            backend::page_fonts(&self.doc, page_id).map_err(|e| text_error(e.to_string()))?;

        let layout = ContentScanner::new(&self.doc, &fonts, xobjects).scan(&content.operations);
        Ok(layout.into_blocks(page_box))
    }
}

/// Text block lines joined with newlines, in block order.
fn block_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter(|b| b.is_text())
        .flat_map(|b| b.lines.iter())
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join("\n")
}
