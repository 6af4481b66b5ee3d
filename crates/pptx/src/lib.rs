//! PPTX (Office Open XML) writer backend for editable slide decks.
//!
//! Builds .pptx packages: a ZIP archive of PresentationML parts with one
//! full-slide background picture and any number of text boxes per slide.

pub mod deck;
pub mod slide;
mod template;
mod xml;

#[cfg(test)]
mod reader;

pub use deck::{PptxDeck, WIDE_HEIGHT_EMU, WIDE_WIDTH_EMU};
pub use slide::{emu, SlideDraft, EMU_PER_INCH};
