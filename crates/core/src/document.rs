//! Loaded source documents and their pages.

use crate::backend::PageSource;
use crate::config::PREVIEW_SCALE;
use crate::error::{Error, Result};
use crate::selection::PageSelection;
use crate::types::Bitmap;

/// A page of a loaded document.
#[derive(Debug)]
pub struct Page<P> {
    /// 1-based page number.
    pub index: usize,

    /// Page rendered at the preview scale; used as the slide background.
    pub preview: Bitmap,

    /// Preview width in pixels.
    pub width: u32,

    /// Preview height in pixels.
    pub height: u32,

    handle: P,
}

impl<P: PageSource> Page<P> {
    /// Render the preview of `handle` and wrap it as page `index`.
    pub fn load(index: usize, handle: P) -> Result<Self> {
        let (preview, _) = handle.render(PREVIEW_SCALE).map_err(|e| {
            Error::LoadError(format!("failed to render preview of page {}: {}", index, e))
        })?;

        Ok(Self {
            index,
            width: preview.width,
            height: preview.height,
            preview,
            handle,
        })
    }

    /// The underlying renderable page.
    pub fn handle(&self) -> &P {
        &self.handle
    }
}

/// A source document, as an ordered list of pages.
#[derive(Debug)]
pub struct Document<P> {
    /// Original filename (without path).
    pub filename: String,

    pages: Vec<Page<P>>,
}

impl<P: PageSource> Document<P> {
    /// Build a document from page handles in page order, rendering previews.
    pub fn from_handles(
        filename: impl Into<String>,
        handles: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        let filename = filename.into();
        let mut pages = Vec::new();

        for (i, handle) in handles.into_iter().enumerate() {
            pages.push(Page::load(i + 1, handle)?);
            log::debug!("Loaded preview of page {} of {}", i + 1, filename);
        }

        log::info!("Loaded {} pages from {}", pages.len(), filename);
        Ok(Self { filename, pages })
    }
}

impl<P> Document<P> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page<P>] {
        &self.pages
    }

    /// Page by 1-based number.
    pub fn page(&self, index: usize) -> Option<&Page<P>> {
        index.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// A selection containing every page; the initial state after loading.
    pub fn select_all(&self) -> PageSelection {
        PageSelection::all(self.pages.len())
    }
}
