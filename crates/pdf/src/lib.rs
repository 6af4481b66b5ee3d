//! MuPDF backend for PDF source documents.
//!
//! Opens PDF files, renders their pages to PNG bitmaps and reads the
//! digital text layer as positioned fragments.

pub mod loader;
pub mod page;
mod raster;

pub use loader::{from_bytes, open};
pub use page::PdfPage;
