//! Structural chapter detection over the markup tree.
//!
//! A chapter boundary is an `h1`/`h2` whose rendered text carries a
//! chapter-signal token, or any element explicitly classed `chapter`.
//! Content is the sibling text between consecutive boundaries.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::Chapter;
use crate::epub::Book;
use crate::text;

/// Chapter-signal tokens in heading text, locale-agnostic case folding.
static HEADING_SIGNAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*((chapter|book|section|part)\s+)|((prologue|prolog|epilogue)(\s+|$))")
        .expect("valid heading signal pattern")
});

/// Candidate boundary elements, filtered further by `is_chapter_heading`.
static HEADING_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, .chapter").expect("valid heading selector"));

/// Detect chapters across every content fragment, in reading order.
///
/// A fragment that yields nothing contributes nothing; it never aborts
/// the scan.
pub fn detect(book: &Book) -> Vec<Chapter> {
    let mut chapters = Vec::new();

    for fragment in &book.fragments {
        if fragment.html.trim().is_empty() {
            log::warn!("skipping empty fragment {}", fragment.href);
            continue;
        }
        chapters.extend(split_fragment(&fragment.html));
    }

    chapters
}

/// Partition one fragment's siblings between consecutive chapter headings.
fn split_fragment(html: &str) -> Vec<Chapter> {
    let document = Html::parse_document(html);
    let mut chapters = Vec::new();

    for heading in document
        .select(&HEADING_CANDIDATES)
        .filter(is_chapter_heading)
    {
        let title = heading.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        // Collect sibling text up to (not including) the next boundary.
        // The heading's own text stays out of the content.
        let mut parts: Vec<String> = Vec::new();
        for sibling in heading.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if is_chapter_heading(&element) {
                    break;
                }
                parts.push(element.text().collect());
            } else if let Some(text_node) = sibling.value().as_text() {
                parts.push(text_node.to_string());
            }
        }

        let content = text::normalize(&parts.join("\n"));
        chapters.push(Chapter::new(title, content));
    }

    chapters
}

fn is_chapter_heading(element: &ElementRef) -> bool {
    if element.value().classes().any(|c| c == "chapter") {
        return true;
    }

    let name = element.value().name();
    if name != "h1" && name != "h2" {
        return false;
    }

    let rendered: String = element.text().collect();
    HEADING_SIGNAL.is_match(&rendered)
}
