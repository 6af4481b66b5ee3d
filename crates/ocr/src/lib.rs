//! Tesseract OCR backend.
//!
//! Drives the `tesseract` command-line program and reads its TSV output as
//! text lines with confidences and pixel bounding boxes.

pub mod tesseract;
mod tsv;

pub use tesseract::{TesseractEngine, TesseractFactory, TesseractOptions, DEFAULT_LANGUAGES};
