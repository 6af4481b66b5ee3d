//! Text-layer reconstruction.
//!
//! Decides per page whether text comes from the digital text layer or from
//! OCR, and maps every fragment or recognized line into slide coordinates
//! with an inferred font size.

use crate::backend::{PageSource, Recognizer};
use crate::config::{
    ConversionConfig, DEFAULT_FONT_FACE, MIN_OCR_CONFIDENCE, OCR_SCALE, POINTS_PER_INCH,
    SLIDE_HEIGHT, SLIDE_WIDTH,
};
use crate::error::{Error, Result};
use crate::normalize::normalize_text;
use crate::types::{Color, OcrLine, PageLayer, PositionedTextBox, TextFragment, TextMode, Viewport};

/// Nominal line height used when a fragment carries no vertical scale.
const FALLBACK_LINE_HEIGHT: f64 = 12.0;

/// Shrink applied to PDF font sizes to offset slide font metrics.
const DIGITAL_FONT_SCALE: f64 = 0.9;

/// Widening applied to digital text boxes.
const DIGITAL_WIDTH_SCALE: f64 = 1.1;

/// Narrowest digital text box, in inches.
const DIGITAL_MIN_WIDTH: f64 = 0.5;

/// Widening applied to OCR text boxes.
const OCR_WIDTH_SCALE: f64 = 1.05;

/// Narrowest OCR text box, in inches.
const OCR_MIN_WIDTH: f64 = 1.0;

/// Ratio of point size to recognized glyph-box height.
const OCR_FONT_SCALE: f64 = 0.7;

/// Maps page text into slide space.
#[derive(Debug, Clone, Copy)]
pub struct TextLayerEngine {
    config: ConversionConfig,
}

impl TextLayerEngine {
    /// Create an engine for one run's config.
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// The config every page of the run is reconstructed with.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Reconstruct the text layer of page `page_number`.
    ///
    /// `recognizer` is the run's OCR engine, if one was started.
    pub fn reconstruct<P, R>(
        &self,
        page_number: usize,
        page: &P,
        recognizer: Option<&mut R>,
    ) -> Result<PageLayer>
    where
        P: PageSource + ?Sized,
        R: Recognizer + ?Sized,
    {
        let fragments = page.text_fragments()?;
        let viewport = page.viewport(1.0)?;

        if !fragments.is_empty() {
            let boxes = fragments
                .iter()
                .filter_map(|f| map_fragment(f, &viewport))
                .collect();
            return Ok(PageLayer {
                page: page_number,
                mode: TextMode::Digital,
                boxes,
            });
        }

        match recognizer {
            Some(recognizer) if self.config.use_ocr => {
                let (bitmap, _) = page.render(OCR_SCALE)?;
                if bitmap.is_empty() {
                    return Err(Error::RasterizationError {
                        page: page_number,
                        message: "OCR bitmap has no pixels".to_string(),
                    });
                }

                let lines = recognizer.recognize(&bitmap)?;
                log::debug!("Page {}: OCR returned {} lines", page_number, lines.len());

                let (width, height) = (f64::from(bitmap.width), f64::from(bitmap.height));
                let boxes = lines
                    .iter()
                    .filter_map(|l| map_ocr_line(l, width, height))
                    .collect();
                Ok(PageLayer {
                    page: page_number,
                    mode: TextMode::Ocr,
                    boxes,
                })
            }
            _ => Ok(PageLayer::empty(page_number)),
        }
    }
}

/// Map a digital text fragment into slide space.
///
/// Returns `None` for fragments with blank text.
pub fn map_fragment(fragment: &TextFragment, viewport: &Viewport) -> Option<PositionedTextBox> {
    let text = normalize_text(&fragment.text);
    if text.is_empty() {
        return None;
    }

    let [a, b, _, _, e, f] = fragment.transform;
    let line_height = if a == 0.0 || a.is_nan() {
        FALLBACK_LINE_HEIGHT
    } else {
        a
    };

    // PDF space has its origin at the bottom-left; slides at the top-left.
    let x = (e / viewport.width) * SLIDE_WIDTH;
    let y = ((viewport.height - f - line_height) / viewport.height) * SLIDE_HEIGHT;
    let font_size = a.hypot(b) * DIGITAL_FONT_SCALE;
    let w = (fragment.width / viewport.width) * SLIDE_WIDTH;

    Some(PositionedTextBox {
        text,
        x,
        y,
        w: (w * DIGITAL_WIDTH_SCALE).max(DIGITAL_MIN_WIDTH),
        h: None,
        font_size,
        color: Color::DARK_GRAY,
        font_face: DEFAULT_FONT_FACE.to_string(),
        transparent: true,
    })
}

/// Map a recognized line from a `bitmap_width` x `bitmap_height` bitmap into
/// slide space.
///
/// Returns `None` for lines below the confidence threshold or with blank text.
pub fn map_ocr_line(
    line: &OcrLine,
    bitmap_width: f64,
    bitmap_height: f64,
) -> Option<PositionedTextBox> {
    if line.confidence < MIN_OCR_CONFIDENCE {
        return None;
    }
    let text = normalize_text(&line.text);
    if text.is_empty() {
        return None;
    }

    let bbox = &line.bbox;
    let x = (bbox.x0 / bitmap_width) * SLIDE_WIDTH;
    let y = (bbox.y0 / bitmap_height) * SLIDE_HEIGHT;
    let w = (bbox.width() / bitmap_width) * SLIDE_WIDTH;
    let h = (bbox.height() / bitmap_height) * SLIDE_HEIGHT;

    Some(PositionedTextBox {
        text,
        x,
        y,
        w: (w * OCR_WIDTH_SCALE).max(OCR_MIN_WIDTH),
        h: Some(h),
        font_size: h * POINTS_PER_INCH * OCR_FONT_SCALE,
        color: Color::BLACK,
        font_face: DEFAULT_FONT_FACE.to_string(),
        transparent: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, ScriptedRecognizer};
    use crate::types::BBox;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_map_fragment_reference_values() {
        let fragment = TextFragment::new("Quarterly results", [12.0, 0.0, 0.0, 12.0, 100.0, 200.0], 50.0);
        let tb = map_fragment(&fragment, &Viewport::new(600.0, 450.0)).unwrap();

        assert!(approx(tb.x, 2.2217), "x = {}", tb.x);
        assert!(approx(tb.y, 3.9667), "y = {}", tb.y);
        assert!(approx(tb.font_size, 10.8), "font = {}", tb.font_size);
        assert!(approx(tb.w, 1.2221), "w = {}", tb.w);
        assert_eq!(tb.h, None);
        assert_eq!(tb.color, Color::DARK_GRAY);
        assert_eq!(tb.font_face, "Arial");
        assert!(tb.transparent);
    }

    #[test]
    fn test_map_fragment_min_width() {
        let fragment = TextFragment::new("i", [10.0, 0.0, 0.0, 10.0, 0.0, 0.0], 2.0);
        let tb = map_fragment(&fragment, &Viewport::new(600.0, 450.0)).unwrap();
        assert_eq!(tb.w, 0.5);
    }

    #[test]
    fn test_map_fragment_zero_scale_uses_nominal_line_height() {
        let fragment = TextFragment::new("x", [0.0, 9.0, -9.0, 0.0, 60.0, 100.0], 20.0);
        let tb = map_fragment(&fragment, &Viewport::new(600.0, 450.0)).unwrap();
        assert!(approx(tb.y, ((450.0 - 100.0 - 12.0) / 450.0) * 7.5));
        // rotated text keeps its magnitude
        assert!(approx(tb.font_size, 8.1));
    }

    #[test]
    fn test_map_fragment_skips_blank_text() {
        let vp = Viewport::new(600.0, 450.0);
        for text in ["", " ", "\t\n", "\u{3000}", "\u{FEFF}"] {
            let fragment = TextFragment::new(text, [50.0, 0.0, 0.0, 50.0, 1.0, 1.0], 400.0);
            assert!(map_fragment(&fragment, &vp).is_none(), "{:?}", text);
        }
    }

    #[test]
    fn test_map_fragment_trims_text() {
        let fragment = TextFragment::new("  Agenda  ", [12.0, 0.0, 0.0, 12.0, 0.0, 0.0], 50.0);
        let tb = map_fragment(&fragment, &Viewport::new(600.0, 450.0)).unwrap();
        assert_eq!(tb.text, "Agenda");
    }

    #[test]
    fn test_map_ocr_line_reference_values() {
        let line = OcrLine::new("Scanned title", 91.0, BBox::new(100.0, 50.0, 300.0, 90.0));
        let tb = map_ocr_line(&line, 2400.0, 1800.0).unwrap();

        assert!(approx(tb.x, (100.0 / 2400.0) * 13.33));
        assert!(approx(tb.y, (50.0 / 1800.0) * 7.5));
        assert!(approx(tb.w, 1.1664), "w = {}", tb.w);
        assert!(approx(tb.h.unwrap(), 0.1667), "h = {:?}", tb.h);
        assert!(approx(tb.font_size, 8.4), "font = {}", tb.font_size);
        assert_eq!(tb.color, Color::BLACK);
        assert!(tb.transparent);
    }

    #[test]
    fn test_map_ocr_line_min_width() {
        let line = OcrLine::new("a", 80.0, BBox::new(0.0, 0.0, 10.0, 20.0));
        let tb = map_ocr_line(&line, 2400.0, 1800.0).unwrap();
        assert_eq!(tb.w, 1.0);
    }

    #[test]
    fn test_map_ocr_line_confidence_threshold() {
        let bbox = BBox::new(0.0, 0.0, 100.0, 20.0);
        assert!(map_ocr_line(&OcrLine::new("low", 29.99, bbox), 1000.0, 1000.0).is_none());
        assert!(map_ocr_line(&OcrLine::new("edge", 30.0, bbox), 1000.0, 1000.0).is_some());
    }

    #[test]
    fn test_digital_text_wins_over_ocr() {
        let engine = TextLayerEngine::new(ConversionConfig::new().with_ocr(true));
        let page = FakePage::blank().with_fragments(vec![TextFragment::new(
            "Hello",
            [12.0, 0.0, 0.0, 12.0, 10.0, 10.0],
            30.0,
        )]);
        let mut ocr = ScriptedRecognizer::new(vec![Ok(vec![OcrLine::new(
            "never",
            99.0,
            BBox::new(0.0, 0.0, 10.0, 10.0),
        )])]);

        let layer = engine.reconstruct(1, &page, Some(&mut ocr)).unwrap();
        assert_eq!(layer.mode, TextMode::Digital);
        assert_eq!(layer.boxes.len(), 1);
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn test_whitespace_only_fragments_still_select_digital() {
        let engine = TextLayerEngine::new(ConversionConfig::new());
        let page = FakePage::blank().with_fragments(vec![TextFragment::new(
            " ",
            [12.0, 0.0, 0.0, 12.0, 10.0, 10.0],
            3.0,
        )]);
        let mut ocr = ScriptedRecognizer::new(vec![]);

        let layer = engine.reconstruct(1, &page, Some(&mut ocr)).unwrap();
        assert_eq!(layer.mode, TextMode::Digital);
        assert!(layer.boxes.is_empty());
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn test_no_text_without_ocr_is_empty() {
        let engine = TextLayerEngine::new(ConversionConfig::new().with_ocr(false));
        let layer = engine
            .reconstruct::<_, ScriptedRecognizer>(3, &FakePage::blank(), None)
            .unwrap();
        assert_eq!(layer.mode, TextMode::Empty);
        assert_eq!(layer.page, 3);
        assert!(layer.boxes.is_empty());
    }

    #[test]
    fn test_ocr_disabled_ignores_engine() {
        let engine = TextLayerEngine::new(ConversionConfig::new().with_ocr(false));
        let mut ocr = ScriptedRecognizer::new(vec![]);
        let layer = engine.reconstruct(1, &FakePage::blank(), Some(&mut ocr)).unwrap();
        assert_eq!(layer.mode, TextMode::Empty);
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn test_ocr_mode_uses_double_scale_bitmap() {
        let engine = TextLayerEngine::new(ConversionConfig::new());
        let page = FakePage::blank();
        // FakePage is 600x450, so the OCR bitmap is 1200x900
        let mut ocr = ScriptedRecognizer::new(vec![Ok(vec![
            OcrLine::new("  first line ", 88.0, BBox::new(120.0, 90.0, 720.0, 135.0)),
            OcrLine::new("noise", 12.0, BBox::new(0.0, 0.0, 50.0, 50.0)),
            OcrLine::new("second line", 30.0, BBox::new(120.0, 180.0, 600.0, 225.0)),
        ])]);

        let layer = engine.reconstruct(2, &page, Some(&mut ocr)).unwrap();
        assert_eq!(layer.mode, TextMode::Ocr);
        assert_eq!(ocr.bitmap_sizes(), vec![(1200, 900)]);

        let texts: Vec<_> = layer.boxes.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["first line", "second line"]);
        assert!(approx(layer.boxes[0].x, 0.1 * 13.33));
        assert!(approx(layer.boxes[0].y, 0.1 * 7.5));
    }

    #[test]
    fn test_recognition_failure_propagates() {
        let engine = TextLayerEngine::new(ConversionConfig::new());
        let mut ocr = ScriptedRecognizer::new(vec![Err("model crashed".to_string())]);
        let err = engine
            .reconstruct(1, &FakePage::blank(), Some(&mut ocr))
            .unwrap_err();
        assert!(matches!(err, Error::RecognitionError(_)));
    }
}
