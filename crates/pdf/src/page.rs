//! A single PDF page backed by MuPDF.

use crate::raster::{encode_png, samples_to_rgb};
use mupdf::{Colorspace, Document, Matrix, TextPageOptions};
use pdfdeck_core::{Bitmap, Error, PageSource, Result, TextFragment, Viewport};
use std::fmt;
use std::rc::Rc;

/// Origin and extent of a page in MuPDF's top-down coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageFrame {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PageFrame {
    fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// One character of a structured-text line, in top-down coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Glyph {
    pub ch: char,
    pub size: f64,
    /// Baseline origin.
    pub origin: (f64, f64),
    /// Lower-left corner of the glyph quad.
    pub start: (f64, f64),
    /// Lower-right corner of the glyph quad.
    pub end: (f64, f64),
}

/// A loaded page of an open PDF.
pub struct PdfPage {
    number: usize,
    frame: PageFrame,
    page: mupdf::Page,
    // The page must not outlive its document.
    _document: Rc<Document>,
}

impl PdfPage {
    /// Load page `number` (1-based) of `document`.
    pub fn load(document: Rc<Document>, number: usize) -> Result<Self> {
        let page = document
            .load_page(number as i32 - 1)
            .map_err(|e| Error::LoadError(format!("failed to load page {}: {}", number, e)))?;
        let bounds = page
            .bounds()
            .map_err(|e| Error::LoadError(format!("failed to measure page {}: {}", number, e)))?;

        Ok(Self {
            number,
            frame: PageFrame {
                x0: bounds.x0 as f64,
                y0: bounds.y0 as f64,
                x1: bounds.x1 as f64,
                y1: bounds.y1 as f64,
            },
            page,
            _document: document,
        })
    }

    fn render_error(&self, message: impl fmt::Display) -> Error {
        Error::RasterizationError {
            page: self.number,
            message: message.to_string(),
        }
    }

    fn extraction_error(&self, message: impl fmt::Display) -> Error {
        Error::ExtractionError {
            page: self.number,
            message: message.to_string(),
        }
    }
}

impl fmt::Debug for PdfPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfPage")
            .field("number", &self.number)
            .field("frame", &self.frame)
            .finish()
    }
}

impl PageSource for PdfPage {
    fn viewport(&self, scale: f64) -> Result<Viewport> {
        Ok(Viewport::new(self.frame.width(), self.frame.height()).scaled(scale))
    }

    fn render(&self, scale: f64) -> Result<(Bitmap, Viewport)> {
        let matrix = Matrix::new_scale(scale as f32, scale as f32);
        let pixmap = self
            .page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
            .map_err(|e| self.render_error(e))?;

        let width = pixmap.width() as u32;
        let height = pixmap.height() as u32;
        let rgb = samples_to_rgb(pixmap.samples(), width, height, pixmap.n() as usize);
        let png = encode_png(rgb, width, height).map_err(|e| self.render_error(e))?;

        log::trace!("Rendered page {} at {}x: {}x{}", self.number, scale, width, height);
        Ok((Bitmap::new(width, height, png), self.viewport(scale)?))
    }

    fn text_fragments(&self) -> Result<Vec<TextFragment>> {
        let text_page = self
            .page
            .to_text_page(TextPageOptions::PRESERVE_WHITESPACE)
            .map_err(|e| self.extraction_error(e))?;

        let mut fragments = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let glyphs: Vec<Glyph> = line
                    .chars()
                    .filter_map(|ch| {
                        let c = ch.char()?;
                        let origin = ch.origin();
                        let quad = ch.quad();
                        Some(Glyph {
                            ch: c,
                            size: ch.size() as f64,
                            origin: (origin.x as f64, origin.y as f64),
                            start: (quad.ll.x as f64, quad.ll.y as f64),
                            end: (quad.lr.x as f64, quad.lr.y as f64),
                        })
                    })
                    .collect();

                if let Some(fragment) = line_fragment(&glyphs, &self.frame) {
                    fragments.push(fragment);
                }
            }
        }

        log::trace!("Page {} has {} text fragments", self.number, fragments.len());
        Ok(fragments)
    }
}

/// Build the fragment for one text line.
///
/// The transform is in the bottom-up page frame: `[a, b, c, d]` is the font
/// size rotated along the baseline and `[e, f]` is the baseline origin of the
/// first glyph. The width is measured along the baseline.
pub(crate) fn line_fragment(glyphs: &[Glyph], frame: &PageFrame) -> Option<TextFragment> {
    let first = glyphs.first()?;
    let last = glyphs.last()?;

    let text: String = glyphs.iter().map(|g| g.ch).collect();
    let size = glyphs.iter().map(|g| g.size).fold(0.0_f64, f64::max);

    // Baseline direction, flipped to y-up.
    let (dx, dy) = (last.origin.0 - first.origin.0, first.origin.1 - last.origin.1);
    let length = dx.hypot(dy);
    let (cos, sin) = if length > f64::EPSILON {
        (dx / length, dy / length)
    } else {
        (1.0, 0.0)
    };

    let transform = [
        size * cos,
        size * sin,
        -size * sin,
        size * cos,
        first.origin.0 - frame.x0,
        frame.y1 - first.origin.1,
    ];
    let width = (last.end.0 - first.start.0).hypot(last.end.1 - first.start.1);

    Some(TextFragment::new(text, transform, width))
}
