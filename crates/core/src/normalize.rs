//! Text cleanup and output naming.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex matching a trailing `.pdf` extension in any letter case.
static PDF_EXTENSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf$").unwrap());

/// Zero-width no-break space, left behind by some PDF text layers.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Suffix appended to the source base name of the generated deck.
pub const OUTPUT_SUFFIX: &str = "_Editable.pptx";

/// Prepare text for a text box.
///
/// Composes to NFC (PDF text layers often store Hangul as decomposed jamo)
/// and trims surrounding whitespace, including byte order marks. Returns an
/// empty string for blank text.
pub fn normalize_text(text: &str) -> String {
    text.nfc()
        .collect::<String>()
        .trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
        .to_string()
}

/// Name of the deck generated from a source file name.
///
/// `report.pdf` becomes `report_Editable.pptx`.
pub fn output_file_name(source_name: &str) -> String {
    let stem = PDF_EXTENSION_REGEX.replace(source_name, "");
    let stem = if stem.is_empty() { "output" } else { &stem };
    format!("{}{}", stem, OUTPUT_SUFFIX)
}
