//! Error types for PDF to slide deck conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The user-facing phase an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opening the source document and rendering its previews.
    Load,
    /// Building and writing the slide deck.
    Convert,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Load => f.write_str("load"),
            Phase::Convert => f.write_str("convert"),
        }
    }
}

/// Errors that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The source document could not be opened or parsed.
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// A selected page does not exist in the document.
    #[error("Page {0} not found (document has {1} pages)")]
    PageNotFound(usize, usize),

    /// A page selection could not be parsed.
    #[error("Invalid page selection: {0}")]
    InvalidSelection(String),

    /// A page could not be rendered to a bitmap.
    #[error("Failed to render page {page}: {message}")]
    RasterizationError { page: usize, message: String },

    /// The digital text layer of a page could not be read.
    #[error("Failed to extract text from page {page}: {message}")]
    ExtractionError { page: usize, message: String },

    /// The OCR engine failed to start or to recognize a page.
    #[error("OCR error: {0}")]
    RecognitionError(String),

    /// The slide deck could not be assembled.
    #[error("Deck assembly error: {0}")]
    AssemblyError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// The phase this error is reported under.
    pub fn phase(&self) -> Phase {
        match self {
            Error::LoadError(_) => Phase::Load,
            _ => Phase::Convert,
        }
    }
}
