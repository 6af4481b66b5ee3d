//! Core domain types and text-layer reconstruction for turning PDF pages
//! into editable slides.

pub mod backend;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod normalize;
pub mod reconstruct;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{DeckAssembler, NoOcr, OcrEngineFactory, PageSource, Recognizer, SlideSink};
pub use config::ConversionConfig;
pub use convert::Converter;
pub use document::{Document, Page};
pub use error::{Error, Phase, Result};
pub use normalize::{normalize_text, output_file_name};
pub use reconstruct::TextLayerEngine;
pub use selection::PageSelection;
pub use types::{
    BBox, Bitmap, Color, OcrLine, PageLayer, PositionedTextBox, TextFragment, TextMode, Viewport,
};
