//! Low-level lopdf access used by the loader.
//!
//! Everything that touches `lopdf::Object` shapes directly lives here, so the
//! layout code only sees decoded operations and plain Rust values.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Page box in PDF user space: (llx, lly, urx, ury).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl PageBox {
    /// US Letter, used when a page carries no usable MediaBox.
    pub const LETTER: PageBox = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    pub fn width(&self) -> f32 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f32 {
        (self.ury - self.lly).abs()
    }
}

/// What an XObject resource holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XObjectKind {
    Image,
    Form,
    Other,
}

/// Follow a reference to its target; direct objects are returned as-is.
fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

/// Look up a page attribute, walking up the page tree for inherited keys.
fn inherited<'a>(doc: &'a LopdfDocument, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    // Page trees are shallow; the bound guards against Parent cycles.
    for _ in 0..32 {
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// The page's MediaBox, falling back to Letter size.
pub fn page_box(doc: &LopdfDocument, page_id: ObjectId) -> PageBox {
    let coords: Option<Vec<f32>> = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| arr.iter().filter_map(get_number).collect());

    match coords.as_deref() {
        Some([llx, lly, urx, ury, ..]) if urx != llx && ury != lly => PageBox {
            llx: llx.min(*urx),
            lly: lly.min(*ury),
            urx: llx.max(*urx),
            ury: lly.max(*ury),
        },
        _ => PageBox::LETTER,
    }
}

/// The raw (decompressed) content stream bytes for a page.
pub fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        // A page without Contents is blank.
        Err(_) => return Ok(Vec::new()),
    };

    match resolve(doc, contents) {
        Some(Object::Stream(s)) => Ok(s
            .decompressed_content()
            .unwrap_or_else(|_| s.content.clone())),
        Some(Object::Array(arr)) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Some(Object::Stream(s)) = resolve(doc, obj) {
                    if let Ok(data) = s.decompressed_content() {
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// XObjects named in the page's resources, by resource name.
pub fn page_xobjects(doc: &LopdfDocument, page_id: ObjectId) -> HashMap<Vec<u8>, XObjectKind> {
    let mut xobjects = HashMap::new();

    let Some(resources) = inherited(doc, page_id, b"Resources").and_then(|o| resolve_dict(doc, o))
    else {
        return xobjects;
    };
    let Some(xobj_dict) = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve_dict(doc, o))
    else {
        return xobjects;
    };

    for (name, obj) in xobj_dict.iter() {
        let kind = match resolve_dict(doc, obj)
            .and_then(|d| d.get(b"Subtype").ok())
            .and_then(|s| s.as_name().ok())
        {
            Some(b"Image") => XObjectKind::Image,
            Some(b"Form") => XObjectKind::Form,
            _ => XObjectKind::Other,
        };
        xobjects.insert(name.clone(), kind);
    }

    xobjects
}

/// Font dictionaries of the page, by font resource name.
pub fn page_fonts(
    doc: &LopdfDocument,
    page_id: ObjectId,
) -> Result<BTreeMap<Vec<u8>, &Dictionary>> {
    doc.get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Extract a number from a PDF operand.
pub fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
