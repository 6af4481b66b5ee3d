//! Conversion settings and layout constants.

/// Slide width in inches (wide 16:9 layout).
pub const SLIDE_WIDTH: f64 = 13.33;

/// Slide height in inches.
pub const SLIDE_HEIGHT: f64 = 7.5;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Render scale of the cached page previews used as slide backgrounds.
pub const PREVIEW_SCALE: f64 = 1.2;

/// Render scale of the bitmap handed to the OCR engine.
pub const OCR_SCALE: f64 = 2.0;

/// OCR lines below this confidence are discarded.
pub const MIN_OCR_CONFIDENCE: f64 = 30.0;

/// Font family of every reconstructed text box.
pub const DEFAULT_FONT_FACE: &str = "Arial";

/// Settings for one conversion run.
///
/// Taken by value when a run starts, so a toggle flipped elsewhere cannot
/// change the behavior of a run in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Recognize text on pages without a digital text layer.
    pub use_ocr: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self { use_ocr: true }
    }
}

impl ConversionConfig {
    /// Create a config with OCR enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable OCR.
    pub fn with_ocr(mut self, use_ocr: bool) -> Self {
        self.use_ocr = use_ocr;
        self
    }
}
