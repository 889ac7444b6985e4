//! Multi-strategy chapter segmentation.
//!
//! Three independent detectors share one output contract (a list of
//! [`Chapter`]s in document order, empty when nothing was found). The
//! orchestrator picks one per request and drives the fallback chain;
//! an empty result is a signal, never an error.

pub mod navigation;
pub mod pattern;
pub mod structural;

use std::collections::HashSet;

use clap::ValueEnum;

use crate::epub::Book;

/// A titled span of source text produced by segmentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Detected heading text, trimmed, never empty
    pub title: String,
    /// Normalized body text; empty when two headings are adjacent
    pub content: String,
    /// Originating content fragment; filled synthetically by `finalize`
    /// for strategies that have none
    pub href: Option<String>,
    /// Nesting depth in the navigation tree; 0 for flat strategies
    pub level: usize,
}

impl Chapter {
    /// Create a flat chapter (no fragment reference, no nesting)
    pub fn new(title: String, content: String) -> Self {
        Self {
            title,
            content,
            href: None,
            level: 0,
        }
    }
}

/// Chapter detection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetectionMethod {
    /// Heading markers in the markup tree
    Structural,
    /// Chapter-title lines in the flat text
    Pattern,
    /// The navigation (table of contents) tree
    Navigation,
    /// Try structural, then pattern, then navigation; first non-empty wins
    Auto,
}

/// Split a book into chapters for the summarization pipeline.
///
/// An explicit method runs alone, with no fallback. `Auto` walks the
/// fixed chain and returns the first non-empty result whole; partial
/// results from different strategies are never mixed.
pub fn split_into_chapters(book: &Book, method: DetectionMethod) -> Vec<Chapter> {
    let chapters = match method {
        DetectionMethod::Structural => structural::detect(book),
        DetectionMethod::Pattern => pattern::detect(&book.all_text()),
        DetectionMethod::Navigation => navigation::detect(book),
        DetectionMethod::Auto => {
            let mut chapters = structural::detect(book);
            if chapters.is_empty() {
                chapters = pattern::detect(&book.all_text());
            }
            if chapters.is_empty() {
                chapters = navigation::detect(book);
            }
            chapters
        }
    };

    finalize(chapters)
}

/// Enumerate every chapter a user could pick from.
///
/// Unlike [`split_into_chapters`], this path always applies the fallback
/// chain (navigation with include-all, then pattern) when the requested
/// strategy finds nothing, so a caller presenting a choice list never
/// receives an empty set for a book any strategy can segment. Chapters
/// that multiple detectors agree on are de-duplicated by normalized title,
/// first occurrence wins.
pub fn enumerate_chapters(book: &Book, method: DetectionMethod) -> Vec<Chapter> {
    let mut chapters = match method {
        DetectionMethod::Structural => structural::detect(book),
        DetectionMethod::Pattern => pattern::detect(&book.all_text()),
        DetectionMethod::Navigation | DetectionMethod::Auto => {
            navigation::detect_include_all(book)
        }
    };

    if chapters.is_empty() {
        chapters = navigation::detect_include_all(book);
    }
    if chapters.is_empty() {
        chapters = pattern::detect(&book.all_text());
    }

    finalize(dedup_by_title(chapters))
}

/// Drop chapters whose normalized title was already seen
fn dedup_by_title(chapters: Vec<Chapter>) -> Vec<Chapter> {
    let mut seen = HashSet::new();
    chapters
        .into_iter()
        .filter(|c| seen.insert(c.title.trim().to_lowercase()))
        .collect()
}

/// Guarantee a non-missing href on every chapter, keyed by position
fn finalize(chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters
        .into_iter()
        .enumerate()
        .map(|(i, mut chapter)| {
            if chapter.href.is_none() {
                chapter.href = Some(format!("chapter_{i}.html"));
            }
            chapter
        })
        .collect()
}
