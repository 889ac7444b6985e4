//! Navigation-tree (table of contents) chapter detection.
//!
//! Depth-first over the externally-owned TOC, carrying the depth
//! explicitly. Entries nested deeper than [`MAX_DEPTH`] are not
//! materialized; their ancestors still are.

use super::{Chapter, pattern};
use crate::epub::{Book, TocEntry};
use crate::text;

/// Deepest nesting level materialized as a chapter.
const MAX_DEPTH: usize = 2;

/// Detect chapters by resolving navigation entries to their fragments.
pub fn detect(book: &Book) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    walk(book, &book.toc, 0, &mut chapters);
    chapters
}

/// Include-all enumeration mode: when the navigation tree resolves to
/// zero chapters, fall back to pattern detection over the flat text so a
/// caller building a choice list still gets every pickable chapter.
pub fn detect_include_all(book: &Book) -> Vec<Chapter> {
    let chapters = detect(book);
    if chapters.is_empty() {
        pattern::detect(&book.all_text())
    } else {
        chapters
    }
}

fn walk(book: &Book, entries: &[TocEntry], depth: usize, out: &mut Vec<Chapter>) {
    if depth > MAX_DEPTH {
        return;
    }

    for entry in entries {
        if !entry.href.is_empty() && !entry.title.is_empty() {
            match book.fragment_by_href(&entry.href) {
                Some(fragment) => out.push(Chapter {
                    title: entry.title.clone(),
                    content: text::html_to_text(&fragment.html),
                    href: Some(entry.href.clone()),
                    level: depth,
                }),
                None => log::warn!(
                    "navigation entry '{}' references missing fragment {}",
                    entry.title,
                    entry.href
                ),
            }
        }

        walk(book, &entry.children, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::Fragment;

    fn entry(title: &str, href: &str, children: Vec<TocEntry>) -> TocEntry {
        TocEntry {
            title: title.to_string(),
            href: href.to_string(),
            children,
        }
    }

    fn fragment(href: &str, html: &str) -> Fragment {
        Fragment {
            href: href.to_string(),
            html: html.to_string(),
        }
    }

    #[test]
    fn test_resolves_entries_with_levels() {
        let book = Book {
            title: "Test".to_string(),
            author: None,
            fragments: vec![
                fragment("part1.xhtml", "<p>Part one text.</p>"),
                fragment("ch1.xhtml", "<p>Chapter one text.</p>"),
            ],
            toc: vec![entry(
                "Part One",
                "part1.xhtml",
                vec![entry("The Beginning", "ch1.xhtml", Vec::new())],
            )],
        };

        let chapters = detect(&book);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Part One");
        assert_eq!(chapters[0].level, 0);
        assert_eq!(chapters[0].content, "Part one text.");
        assert_eq!(chapters[1].title, "The Beginning");
        assert_eq!(chapters[1].level, 1);
    }

    #[test]
    fn test_depth_bound() {
        // Four levels deep; only the first three (0, 1, 2) materialize.
        let book = Book {
            title: "Test".to_string(),
            author: None,
            fragments: vec![fragment("a.xhtml", "<p>text</p>")],
            toc: vec![entry(
                "L0",
                "a.xhtml",
                vec![entry(
                    "L1",
                    "a.xhtml",
                    vec![entry("L2", "a.xhtml", vec![entry("L3", "a.xhtml", Vec::new())])],
                )],
            )],
        };

        let chapters = detect(&book);
        let titles: Vec<&str> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["L0", "L1", "L2"]);
        assert_eq!(chapters[2].level, 2);
    }

    #[test]
    fn test_missing_fragment_skipped() {
        let book = Book {
            title: "Test".to_string(),
            author: None,
            fragments: vec![fragment("real.xhtml", "<p>exists</p>")],
            toc: vec![
                entry("Ghost", "missing.xhtml", Vec::new()),
                entry("Real", "real.xhtml", Vec::new()),
            ],
        };

        let chapters = detect(&book);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Real");
    }

    #[test]
    fn test_include_all_falls_back_to_pattern() {
        let book = Book {
            title: "Test".to_string(),
            author: None,
            fragments: vec![fragment(
                "flat.xhtml",
                "<p>Chapter 1 Arrival</p>\n<p>Body text.</p>",
            )],
            toc: Vec::new(),
        };

        assert!(detect(&book).is_empty());
        let chapters = detect_include_all(&book);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1 Arrival");
    }

    #[test]
    fn test_empty_toc_yields_empty() {
        let book = Book {
            title: "Test".to_string(),
            author: None,
            fragments: Vec::new(),
            toc: Vec::new(),
        };
        assert!(detect(&book).is_empty());
    }
}
