//! Interfaces to the collaborators the conversion depends on.
//!
//! Page rendering and text extraction, OCR, and deck serialization are
//! provided by other crates; the conversion only sees these traits.

use crate::error::Result;
use crate::types::{Bitmap, OcrLine, PositionedTextBox, TextFragment, Viewport};

/// A page that can be rendered and whose digital text can be read.
pub trait PageSource {
    /// Page geometry at `scale` without rendering.
    fn viewport(&self, scale: f64) -> Result<Viewport>;

    /// Render the page at `scale`.
    fn render(&self, scale: f64) -> Result<(Bitmap, Viewport)>;

    /// Text fragments of the digital text layer in the unscaled frame.
    ///
    /// An empty sequence means the page has no digital text.
    fn text_fragments(&self) -> Result<Vec<TextFragment>>;
}

/// A running OCR engine.
///
/// Dropping the engine releases its resources.
pub trait Recognizer {
    /// Recognize the text lines of a bitmap, in reading order.
    fn recognize(&mut self, bitmap: &Bitmap) -> Result<Vec<OcrLine>>;
}

/// Starts OCR engines.
pub trait OcrEngineFactory {
    type Engine: Recognizer;

    /// Start an engine for one conversion run.
    fn start(&self) -> Result<Self::Engine>;
}

/// A slide under construction.
pub trait SlideSink {
    /// Place an image over the whole slide.
    fn add_image(&mut self, image: &Bitmap);

    /// Add a text box.
    fn add_text_box(&mut self, text_box: &PositionedTextBox);
}

/// Accumulates slides and serializes the finished deck.
pub trait DeckAssembler {
    type Slide: SlideSink;

    /// Append a new empty slide.
    fn add_slide(&mut self) -> &mut Self::Slide;

    /// Serialize all slides into the deck file.
    fn finish(self) -> Result<Vec<u8>>;
}

/// Factory for runs that never use OCR.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

/// Engine type of [`NoOcr`]; it can never be constructed.
#[derive(Debug)]
pub enum NoEngine {}

impl Recognizer for NoEngine {
    fn recognize(&mut self, _bitmap: &Bitmap) -> Result<Vec<OcrLine>> {
        match *self {}
    }
}

impl OcrEngineFactory for NoOcr {
    type Engine = NoEngine;

    fn start(&self) -> Result<NoEngine> {
        Err(crate::Error::RecognitionError(
            "OCR is not available".to_string(),
        ))
    }
}
