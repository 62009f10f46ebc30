//! Page selection
//!
//! Resolves a [`PageSelection`] into the zero-based indices of the pages that
//! receive a stamp. Custom selections use a small range language:
//! comma-separated tokens, each a 1-based page number (`5`) or an inclusive
//! range (`1-3`). A range with no end (`8-`) runs to the last page.
//! Malformed or out-of-range tokens are ignored rather than reported.

use crate::types::PageSelection;
use std::collections::BTreeSet;

/// Resolve a page selection against a document with `total_pages` pages
pub fn resolve_target_pages(selection: &PageSelection, total_pages: usize) -> Vec<usize> {
    match selection {
        PageSelection::First => first_page(total_pages),
        PageSelection::Last => total_pages.checked_sub(1).into_iter().collect(),
        PageSelection::All => (0..total_pages).collect(),
        PageSelection::Range(spec) => parse_page_range(spec, total_pages),
    }
}

fn first_page(total_pages: usize) -> Vec<usize> {
    if total_pages > 0 { vec![0] } else { Vec::new() }
}

/// Parse a page-range expression into sorted, unique, zero-based indices.
///
/// ```
/// use pdf_stamp::parse_page_range;
/// assert_eq!(parse_page_range("1-3,5,8-", 10), vec![0, 1, 2, 4, 7, 8, 9]);
/// ```
pub fn parse_page_range(spec: &str, total_pages: usize) -> Vec<usize> {
    let mut indices = BTreeSet::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((start, end)) = parse_token(token, total_pages) else {
            continue;
        };
        // Clamp before iterating so "1-999999999" stays cheap
        let first = start.max(1);
        let last = end.min(total_pages);
        for page in first..=last {
            indices.insert(page - 1);
        }
    }

    indices.into_iter().collect()
}

/// Parse one token into an inclusive 1-based `(start, end)` pair
fn parse_token(token: &str, total_pages: usize) -> Option<(usize, usize)> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = start.trim().parse::<usize>().ok()?;
            let end = end.trim();
            let end = if end.is_empty() {
                total_pages
            } else {
                end.parse::<usize>().ok()?
            };
            Some((start, end))
        }
        None => {
            let page = token.parse::<usize>().ok()?;
            Some((page, page))
        }
    }
}
