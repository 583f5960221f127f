//! Data model shared by the loader, the sentence pipeline and the exporters.
//!
//! Pages are read-only input; records are the pipeline's only output.

mod page;
mod record;

pub use page::{BlockKind, BoundingBox, ContentBlock, Page, TextLine, TextSpan};
pub use record::SentenceRecord;
