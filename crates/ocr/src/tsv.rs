//! Parsing of Tesseract's TSV output.

use pdfdeck_core::{BBox, OcrLine};
use std::collections::BTreeMap;

/// Layout level of a line row.
const LEVEL_LINE: u32 = 4;

/// Layout level of a word row.
const LEVEL_WORD: u32 = 5;

/// Number of columns in a TSV row.
const COLUMNS: usize = 12;

/// (page, block, paragraph, line)
type LineKey = (u32, u32, u32, u32);

#[derive(Debug, Default)]
struct LineAccumulator {
    bbox: Option<BBox>,
    words: Vec<String>,
    word_bbox: Option<BBox>,
    confidence_sum: f64,
}

/// Group the word rows of a TSV report into lines, in reading order.
///
/// A line's text is its words joined by single spaces and its confidence is
/// the mean word confidence. The line row's box is used when present,
/// otherwise the union of its word boxes. Lines without words are dropped.
pub(crate) fn parse_lines(tsv: &str) -> Vec<OcrLine> {
    let mut lines: BTreeMap<LineKey, LineAccumulator> = BTreeMap::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < COLUMNS {
            continue;
        }

        let number = |i: usize| cols[i].trim().parse::<u32>().unwrap_or(0);
        let level = number(0);
        let key = (number(1), number(2), number(3), number(4));
        let (left, top) = (number(6) as f64, number(7) as f64);
        let bbox = BBox::new(left, top, left + number(8) as f64, top + number(9) as f64);

        match level {
            LEVEL_LINE => {
                lines.entry(key).or_default().bbox = Some(bbox);
            }
            LEVEL_WORD => {
                let confidence: f64 = cols[10].trim().parse().unwrap_or(-1.0);
                let text = cols[11].trim();
                if text.is_empty() || confidence < 0.0 {
                    continue;
                }

                let line = lines.entry(key).or_default();
                line.words.push(text.to_string());
                line.confidence_sum += confidence;
                line.word_bbox = Some(match line.word_bbox {
                    Some(b) => b.union(&bbox),
                    None => bbox,
                });
            }
            _ => {}
        }
    }

    lines
        .into_values()
        .filter(|line| !line.words.is_empty())
        .filter_map(|line| {
            let bbox = line.bbox.or(line.word_bbox)?;
            let confidence = line.confidence_sum / line.words.len() as f64;
            Some(OcrLine::new(line.words.join(" "), confidence, bbox))
        })
        .collect()
}

/// Language codes listed by `tesseract --list-langs`.
pub(crate) fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of"))
        .map(String::from)
        .collect()
}

/// Requested codes (`kor+eng`) that are not in `available`.
pub(crate) fn missing_languages(requested: &str, available: &[String]) -> Vec<String> {
    requested
        .split(['+', ',', ' '])
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .filter(|lang| !available.iter().any(|a| a == lang))
        .map(String::from)
        .collect()
}
