//! Scripted collaborators for tests.

use crate::backend::{DeckAssembler, OcrEngineFactory, PageSource, Recognizer, SlideSink};
use crate::error::{Error, Result};
use crate::types::{Bitmap, OcrLine, PositionedTextBox, TextFragment, Viewport};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A 600x450 point page with scripted text.
#[derive(Debug, Clone)]
pub struct FakePage {
    viewport: Viewport,
    fragments: Vec<TextFragment>,
    fail_render: bool,
}

impl FakePage {
    /// A page without digital text.
    pub fn blank() -> Self {
        Self {
            viewport: Viewport::new(600.0, 450.0),
            fragments: Vec::new(),
            fail_render: false,
        }
    }

    pub fn with_fragments(mut self, fragments: Vec<TextFragment>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }
}

impl PageSource for FakePage {
    fn viewport(&self, scale: f64) -> Result<Viewport> {
        Ok(self.viewport.scaled(scale))
    }

    fn render(&self, scale: f64) -> Result<(Bitmap, Viewport)> {
        if self.fail_render {
            return Err(Error::RasterizationError {
                page: 0,
                message: "scripted failure".to_string(),
            });
        }
        let vp = self.viewport.scaled(scale);
        let bitmap = Bitmap::new(vp.width as u32, vp.height as u32, vec![0x89, b'P', b'N', b'G']);
        Ok((bitmap, vp))
    }

    fn text_fragments(&self) -> Result<Vec<TextFragment>> {
        Ok(self.fragments.clone())
    }
}

/// Recognizer answering each call with the next scripted response.
///
/// An `Err` response becomes a recognition error; once the script is used
/// up every call returns no lines.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    responses: VecDeque<std::result::Result<Vec<OcrLine>, String>>,
    bitmap_sizes: Vec<(u32, u32)>,
}

impl ScriptedRecognizer {
    pub fn new(responses: Vec<std::result::Result<Vec<OcrLine>, String>>) -> Self {
        Self {
            responses: responses.into(),
            bitmap_sizes: Vec::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.bitmap_sizes.len()
    }

    pub fn bitmap_sizes(&self) -> Vec<(u32, u32)> {
        self.bitmap_sizes.clone()
    }
}

impl Recognizer for ScriptedRecognizer {
    fn recognize(&mut self, bitmap: &Bitmap) -> Result<Vec<OcrLine>> {
        self.bitmap_sizes.push((bitmap.width, bitmap.height));
        match self.responses.pop_front() {
            Some(Ok(lines)) => Ok(lines),
            Some(Err(message)) => Err(Error::RecognitionError(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Counts engine starts and releases.
#[derive(Debug, Default, Clone)]
pub struct EngineStats {
    pub started: Rc<Cell<usize>>,
    pub released: Rc<Cell<usize>>,
    pub recognized: Rc<Cell<usize>>,
}

/// Engine handed out by [`ScriptedFactory`]; counts its own release.
#[derive(Debug)]
pub struct TrackedEngine {
    inner: ScriptedRecognizer,
    stats: EngineStats,
}

impl Recognizer for TrackedEngine {
    fn recognize(&mut self, bitmap: &Bitmap) -> Result<Vec<OcrLine>> {
        self.stats.recognized.set(self.stats.recognized.get() + 1);
        self.inner.recognize(bitmap)
    }
}

impl Drop for TrackedEngine {
    fn drop(&mut self) {
        self.stats.released.set(self.stats.released.get() + 1);
    }
}

/// Factory starting [`TrackedEngine`]s with a shared script.
#[derive(Debug, Default)]
pub struct ScriptedFactory {
    script: RefCell<Vec<std::result::Result<Vec<OcrLine>, String>>>,
    fail_start: bool,
    pub stats: EngineStats,
}

impl ScriptedFactory {
    pub fn new(script: Vec<std::result::Result<Vec<OcrLine>, String>>) -> Self {
        Self {
            script: RefCell::new(script),
            ..Self::default()
        }
    }

    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }
}

impl OcrEngineFactory for ScriptedFactory {
    type Engine = TrackedEngine;

    fn start(&self) -> Result<TrackedEngine> {
        if self.fail_start {
            return Err(Error::RecognitionError("no language data".to_string()));
        }
        self.stats.started.set(self.stats.started.get() + 1);
        Ok(TrackedEngine {
            inner: ScriptedRecognizer::new(self.script.take()),
            stats: self.stats.clone(),
        })
    }
}

/// A slide recorded by [`RecordingDeck`].
#[derive(Debug, Default, Clone)]
pub struct RecordedSlide {
    pub images: Vec<(u32, u32)>,
    pub text_boxes: Vec<PositionedTextBox>,
}

impl SlideSink for RecordedSlide {
    fn add_image(&mut self, image: &Bitmap) {
        self.images.push((image.width, image.height));
    }

    fn add_text_box(&mut self, text_box: &PositionedTextBox) {
        self.text_boxes.push(text_box.clone());
    }
}

/// Deck that records what it is asked to do.
///
/// The shared `calls` counter survives the deck being consumed or dropped.
#[derive(Debug, Default)]
pub struct RecordingDeck {
    pub slides: Vec<RecordedSlide>,
    pub calls: Rc<Cell<usize>>,
    pub finished: Rc<RefCell<Option<Vec<RecordedSlide>>>>,
}

impl DeckAssembler for RecordingDeck {
    type Slide = RecordedSlide;

    fn add_slide(&mut self) -> &mut RecordedSlide {
        self.calls.set(self.calls.get() + 1);
        self.slides.push(RecordedSlide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        *self.finished.borrow_mut() = Some(self.slides.clone());
        Ok(b"deck".to_vec())
    }
}
