//! CLI tool for converting PDF files into editable PowerPoint decks.

use anyhow::{Context, Result};
use clap::Parser;
use pdfdeck_core::{output_file_name, ConversionConfig, Converter, PageLayer, PageSelection};
use pdfdeck_ocr::{TesseractFactory, TesseractOptions, DEFAULT_LANGUAGES};
use pdfdeck_pptx::PptxDeck;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Convert PDF files into PowerPoint decks with editable text boxes.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PDF file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not run OCR on pages without a digital text layer
    #[arg(long)]
    no_ocr: bool,

    /// Pages to convert, e.g. "1-3,5" (default: all pages)
    #[arg(short, long)]
    pages: Option<String>,

    /// OCR languages joined with '+'
    #[arg(short = 'l', long = "lang", default_value = DEFAULT_LANGUAGES)]
    languages: String,

    /// Path to the tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,

    /// Print the reconstructed text layer as JSON instead of writing a deck
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Result of processing one input file.
#[derive(Debug)]
enum Outcome {
    Written(PathBuf),
    Printed,
    NothingSelected,
}

/// JSON report of one input file.
#[derive(Serialize)]
struct LayerReport<'a> {
    file: &'a str,
    pages: &'a [PageLayer],
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let ocr = TesseractFactory::new(
        TesseractOptions::default()
            .with_binary(&args.tesseract)
            .with_languages(&args.languages),
    );
    let converter = Converter::new(ConversionConfig::new().with_ocr(!args.no_ocr), &ocr);

    let mut failed = 0;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &converter) {
            Ok(Outcome::Written(path)) => {
                if args.verbose {
                    eprintln!("Written to: {}", path.display());
                }
            }
            Ok(Outcome::Printed) => {}
            Ok(Outcome::NothingSelected) => {
                eprintln!("No pages selected in {}; nothing written", input_path.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, args.input.len());
    }
    Ok(())
}

/// Convert a single PDF file.
fn process_file(
    input_path: &Path,
    args: &Args,
    converter: &Converter<'_, TesseractFactory>,
) -> Result<Outcome> {
    let document = pdfdeck_pdf::open(input_path).map_err(phased)?;

    let selection = match &args.pages {
        Some(pages) => PageSelection::parse(pages, document.page_count()).map_err(phased)?,
        None => document.select_all(),
    };

    if args.verbose {
        eprintln!(
            "  Found {} pages, {} selected (OCR {})",
            document.page_count(),
            selection.len(),
            if converter.config().use_ocr { "on" } else { "off" }
        );
    }

    if args.json {
        let layers = converter.reconstruct(&document, &selection).map_err(phased)?;
        let report = LayerReport {
            file: &document.filename,
            pages: &layers,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize layers")?;
        println!("{}", json);
        return Ok(Outcome::Printed);
    }

    let deck = PptxDeck::new(document.filename.as_str());
    let Some(bytes) = converter
        .convert(&document, &selection, deck)
        .map_err(phased)?
    else {
        return Ok(Outcome::NothingSelected);
    };

    let output_path = get_output_path(input_path, &document.filename, args.output.as_ref())?;
    write_output(&output_path, &bytes)?;
    Ok(Outcome::Written(output_path))
}

/// Attach the failing phase to a conversion error.
fn phased(error: pdfdeck_core::Error) -> anyhow::Error {
    let phase = error.phase();
    anyhow::Error::new(error).context(format!("{} failed", phase))
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, filename: &str, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let output_filename = output_file_name(filename);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}

/// Write the deck next to its final path and move it into place.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    Ok(())
}
