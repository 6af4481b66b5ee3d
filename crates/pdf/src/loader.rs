//! Opening PDF files as source documents.

use crate::page::PdfPage;
use pdfdeck_core::{Document, Error, Result};
use std::path::Path;
use std::rc::Rc;

const PDF_MIME: &str = "application/pdf";

/// Open a PDF file and render the preview of every page.
pub fn open(path: impl AsRef<Path>) -> Result<Document<PdfPage>> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| Error::LoadError(format!("cannot read {}: {}", path.display(), e)))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    from_bytes(filename, &data)
}

/// Load a PDF from memory and render the preview of every page.
pub fn from_bytes(filename: impl Into<String>, data: &[u8]) -> Result<Document<PdfPage>> {
    let filename = filename.into();
    let document = mupdf::Document::from_bytes(data, PDF_MIME)
        .map_err(|e| Error::LoadError(format!("{} is not a readable PDF: {}", filename, e)))?;
    let count = document
        .page_count()
        .map_err(|e| Error::LoadError(format!("cannot count pages of {}: {}", filename, e)))?;

    log::debug!("Opened {} with {} pages", filename, count);

    let document = Rc::new(document);
    let pages = (1..=count.max(0) as usize)
        .map(|number| PdfPage::load(Rc::clone(&document), number))
        .collect::<Result<Vec<_>>>()?;

    Document::from_handles(filename, pages)
}
