//! PDF loading module.

mod backend;
mod layout;
mod loader;
mod options;

pub use backend::PageBox;
pub use loader::PdfLoader;
pub use options::{ErrorMode, LoadOptions};
