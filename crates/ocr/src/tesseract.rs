//! Tesseract engine lifecycle and recognition.

use crate::tsv::{missing_languages, parse_language_list, parse_lines};
use pdfdeck_core::{Bitmap, Error, OcrEngineFactory, OcrLine, Recognizer, Result};
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Recognition languages used when none are configured.
pub const DEFAULT_LANGUAGES: &str = "kor+eng";

/// Fully automatic page segmentation.
const DEFAULT_PSM: u32 = 3;

/// How to invoke Tesseract.
#[derive(Debug, Clone, PartialEq)]
pub struct TesseractOptions {
    /// Program to run; looked up on `PATH` when not absolute.
    pub binary: PathBuf,

    /// Language codes joined with `+`.
    pub languages: String,

    /// Page segmentation mode.
    pub psm: u32,
}

impl Default for TesseractOptions {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            languages: DEFAULT_LANGUAGES.to_string(),
            psm: DEFAULT_PSM,
        }
    }
}

impl TesseractOptions {
    pub fn with_languages(mut self, languages: impl Into<String>) -> Self {
        self.languages = languages.into();
        self
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

/// Starts Tesseract engines after checking the program and its languages.
#[derive(Debug, Clone, Default)]
pub struct TesseractFactory {
    options: TesseractOptions,
}

impl TesseractFactory {
    pub fn new(options: TesseractOptions) -> Self {
        Self { options }
    }

    fn available_languages(&self) -> Result<Vec<String>> {
        let output = run(Command::new(&self.options.binary).arg("--list-langs"), &self.options)?;

        // Older releases print the list on stderr.
        let listing = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };
        Ok(parse_language_list(&listing))
    }
}

impl OcrEngineFactory for TesseractFactory {
    type Engine = TesseractEngine;

    fn start(&self) -> Result<TesseractEngine> {
        if self.options.languages.trim().is_empty() {
            return Err(Error::RecognitionError("no OCR languages configured".to_string()));
        }

        let available = self.available_languages()?;
        let missing = missing_languages(&self.options.languages, &available);
        if !missing.is_empty() {
            return Err(Error::RecognitionError(format!(
                "OCR language(s) not installed: {} (available: {})",
                missing.join(", "),
                available.join(", ")
            )));
        }

        let scratch = tempfile::Builder::new()
            .prefix("pdfdeck-ocr-")
            .tempdir()
            .map_err(|e| Error::RecognitionError(format!("failed to create scratch directory: {}", e)))?;

        log::debug!("Started OCR engine ({})", self.options.languages);
        Ok(TesseractEngine {
            options: self.options.clone(),
            scratch,
            recognized: 0,
        })
    }
}

/// A started Tesseract engine.
///
/// Images are passed through a private scratch directory that is removed
/// when the engine is dropped.
#[derive(Debug)]
pub struct TesseractEngine {
    options: TesseractOptions,
    scratch: TempDir,
    recognized: usize,
}

impl TesseractEngine {
    /// Number of images recognized so far.
    pub fn recognized(&self) -> usize {
        self.recognized
    }
}

impl Recognizer for TesseractEngine {
    fn recognize(&mut self, bitmap: &Bitmap) -> Result<Vec<OcrLine>> {
        let input = self
            .scratch
            .path()
            .join(format!("image-{}.png", self.recognized + 1));
        std::fs::write(&input, &bitmap.png)
            .map_err(|e| Error::RecognitionError(format!("failed to stage image: {}", e)))?;

        let psm = self.options.psm.to_string();
        let output = run(
            Command::new(&self.options.binary)
                .arg(&input)
                .arg("stdout")
                .args(["-l", self.options.languages.as_str()])
                .args(["--psm", psm.as_str()])
                .arg("tsv"),
            &self.options,
        );
        let _ = std::fs::remove_file(&input);
        let output = output?;

        self.recognized += 1;
        let lines = parse_lines(&String::from_utf8_lossy(&output.stdout));
        log::debug!(
            "Recognized {} lines in {}x{} image",
            lines.len(),
            bitmap.width,
            bitmap.height
        );
        Ok(lines)
    }
}

impl Drop for TesseractEngine {
    fn drop(&mut self) {
        log::debug!("Released OCR engine after {} images", self.recognized);
    }
}

/// Run a Tesseract command, failing on spawn errors and non-zero exits.
fn run(command: &mut Command, options: &TesseractOptions) -> Result<Output> {
    let output = command.output().map_err(|e| {
        Error::RecognitionError(format!(
            "failed to run {} (is it installed?): {}",
            options.binary.display(),
            e
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::RecognitionError(format!(
            "{} failed: {}",
            options.binary.display(),
            stderr.trim()
        )));
    }
    Ok(output)
}
