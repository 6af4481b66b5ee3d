//! Page selection.

use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// The set of selected 1-based page numbers.
///
/// Iteration is always in ascending page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<usize>,
}

impl PageSelection {
    /// An empty selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every page of a document with `page_count` pages.
    pub fn all(page_count: usize) -> Self {
        Self {
            pages: (1..=page_count).collect(),
        }
    }

    /// Parse a list such as `1-3,5` against a document with `page_count` pages.
    pub fn parse(ranges: &str, page_count: usize) -> Result<Self> {
        let mut pages = BTreeSet::new();

        for part in ranges.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (start, end) = match part.split_once('-') {
                Some((a, b)) => (parse_page(a)?, parse_page(b)?),
                None => {
                    let page = parse_page(part)?;
                    (page, page)
                }
            };

            if start > end {
                return Err(Error::InvalidSelection(format!("invalid page range '{}'", part)));
            }
            if end > page_count {
                return Err(Error::PageNotFound(end, page_count));
            }

            pages.extend(start..=end);
        }

        Ok(Self { pages })
    }

    /// Select or deselect one page.
    pub fn toggle(&mut self, page: usize) {
        if !self.pages.remove(&page) {
            self.pages.insert(page);
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn contains(&self, page: usize) -> bool {
        self.pages.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Selected pages in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.iter().copied()
    }
}

fn parse_page(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(Error::InvalidSelection(format!("invalid page number '{}'", s.trim()))),
        Ok(n) => Ok(n),
    }
}
