//! Domain types for page content and reconstructed text boxes.

use serde::{Serialize, Serializer};

/// An encoded raster image of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// PNG-encoded image data.
    pub png: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from PNG data and its pixel dimensions.
    pub fn new(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    /// Whether the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Page geometry at a given render scale, in source units times scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The same page geometry at another scale.
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// A run of text from the page's digital text layer.
///
/// Coordinates are in the page's native point space with the origin at the
/// bottom-left corner. The transform is `[a, b, c, d, e, f]`: `a`/`b` carry
/// the glyph scale (and rotation), `e`/`f` the baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub transform: [f64; 6],
    pub width: f64,
}

impl TextFragment {
    /// Create a fragment from its text, transform and rendered width.
    pub fn new(text: impl Into<String>, transform: [f64; 6], width: f64) -> Self {
        Self {
            text: text.into(),
            transform,
            width,
        }
    }
}

/// An axis-aligned box in bitmap pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A recognized line of text from the OCR engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrLine {
    pub text: String,

    /// Recognition confidence in `[0, 100]`.
    pub confidence: f64,

    pub bbox: BBox,
}

impl OcrLine {
    /// Create a line from its text, confidence and bounding box.
    pub fn new(text: impl Into<String>, confidence: f64, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bbox,
        }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Neutral dark gray used for digital text.
    pub const DARK_GRAY: Color = Color([0x36, 0x36, 0x36]);

    /// Black used for OCR text.
    pub const BLACK: Color = Color([0x00, 0x00, 0x00]);

    /// Uppercase hex form without a leading `#`, e.g. `363636`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A text box positioned on a slide.
///
/// Positions and sizes are absolute slide units (inches); the font size is in
/// points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedTextBox {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,

    /// Box height; `None` lets the deck size the box to its text.
    pub h: Option<f64>,

    pub font_size: f64,
    pub color: Color,
    pub font_face: String,

    /// Leave the box unfilled so the page image shows through.
    pub transparent: bool,
}

/// How the text of a page was reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// From the embedded digital text layer.
    Digital,
    /// From OCR of the rendered page.
    Ocr,
    /// No text; background only.
    Empty,
}

/// The reconstructed text layer of one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageLayer {
    /// 1-based page number.
    pub page: usize,

    pub mode: TextMode,

    /// Text boxes in source order.
    pub boxes: Vec<PositionedTextBox>,
}

impl PageLayer {
    /// A background-only layer.
    pub fn empty(page: usize) -> Self {
        Self {
            page,
            mode: TextMode::Empty,
            boxes: Vec::new(),
        }
    }
}
