//! Conversion runs.

use crate::backend::{DeckAssembler, OcrEngineFactory, PageSource, SlideSink};
use crate::config::ConversionConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::reconstruct::TextLayerEngine;
use crate::selection::PageSelection;
use crate::types::PageLayer;

/// Converts selected pages of a document into a slide deck.
#[derive(Debug)]
pub struct Converter<'a, F> {
    engine: TextLayerEngine,
    ocr: &'a F,
}

impl<'a, F: OcrEngineFactory> Converter<'a, F> {
    /// Create a converter. `config` is fixed for every run of this converter.
    pub fn new(config: ConversionConfig, ocr: &'a F) -> Self {
        Self {
            engine: TextLayerEngine::new(config),
            ocr,
        }
    }

    /// The config fixed at construction; `use_ocr` decides whether runs start an engine.
    pub fn config(&self) -> &ConversionConfig {
        self.engine.config()
    }

    /// Convert the selected pages into a deck file.
    ///
    /// Returns `Ok(None)` without touching `assembler` when nothing is
    /// selected. On any failure the partially built deck is dropped and no
    /// bytes are produced.
    pub fn convert<P, A>(
        &self,
        document: &Document<P>,
        selection: &PageSelection,
        mut assembler: A,
    ) -> Result<Option<Vec<u8>>>
    where
        P: PageSource,
        A: DeckAssembler,
    {
        if selection.is_empty() {
            log::info!("No pages selected; nothing to convert");
            return Ok(None);
        }

        self.run(document, selection, |page, layer| {
            let slide = assembler.add_slide();
            slide.add_image(&page.preview);
            for text_box in &layer.boxes {
                slide.add_text_box(text_box);
            }
        })?;

        let bytes = assembler.finish()?;
        log::info!(
            "Assembled {} slides from {} ({} bytes)",
            selection.len(),
            document.filename,
            bytes.len()
        );
        Ok(Some(bytes))
    }

    /// Reconstruct the text layers of the selected pages without building a deck.
    pub fn reconstruct<P: PageSource>(
        &self,
        document: &Document<P>,
        selection: &PageSelection,
    ) -> Result<Vec<PageLayer>> {
        let mut layers = Vec::with_capacity(selection.len());
        if selection.is_empty() {
            return Ok(layers);
        }
        self.run(document, selection, |_, layer| layers.push(layer))?;
        Ok(layers)
    }

    /// Process the selected pages in ascending order, handing each page and
    /// its layer to `sink`.
    ///
    /// The OCR engine is started once before the first page and dropped when
    /// this returns, whether the run succeeded or not.
    fn run<P, S>(&self, document: &Document<P>, selection: &PageSelection, mut sink: S) -> Result<()>
    where
        P: PageSource,
        S: FnMut(&crate::document::Page<P>, PageLayer),
    {
        let config = *self.engine.config();

        let mut recognizer = if config.use_ocr {
            log::debug!("Starting OCR engine");
            Some(self.ocr.start()?)
        } else {
            None
        };

        for index in selection.iter() {
            let page = document
                .page(index)
                .ok_or(Error::PageNotFound(index, document.page_count()))?;

            let layer = self
                .engine
                .reconstruct(index, page.handle(), recognizer.as_mut())?;
            log::info!(
                "Page {}: {:?} mode, {} text boxes",
                index,
                layer.mode,
                layer.boxes.len()
            );
            sink(page, layer);
        }

        if recognizer.is_some() {
            log::debug!("Releasing OCR engine");
        }
        Ok(())
    }
}
