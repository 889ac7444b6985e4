// EPUB loading: spine-order content fragments plus the navigation tree

use anyhow::Result;
use std::path::Path;

/// One content document from the EPUB spine
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Resource path inside the container
    pub href: String,
    /// Raw markup content
    pub html: String,
}

/// One entry in the navigation (table of contents) tree
#[derive(Debug, Clone)]
pub struct TocEntry {
    pub title: String,
    /// Referenced content fragment, possibly with a `#anchor` suffix
    pub href: String,
    pub children: Vec<TocEntry>,
}

/// Parsed EPUB book
#[derive(Debug)]
pub struct Book {
    /// Book title
    pub title: String,
    /// Book author(s)
    pub author: Option<String>,
    /// Content fragments in reading order
    pub fragments: Vec<Fragment>,
    /// Hierarchical navigation tree (may be empty)
    pub toc: Vec<TocEntry>,
}

impl Book {
    /// Resolve a navigation href to its content fragment.
    ///
    /// Anchors are stripped; TOC hrefs are often relative to a subdirectory
    /// of the container, so matching falls back to path-suffix comparison.
    pub fn fragment_by_href(&self, href: &str) -> Option<&Fragment> {
        let path = href.split('#').next().unwrap_or(href);
        if path.is_empty() {
            return None;
        }

        self.fragments
            .iter()
            .find(|f| f.href == path)
            .or_else(|| {
                self.fragments
                    .iter()
                    .find(|f| f.href.ends_with(path) || path.ends_with(&f.href))
            })
    }

    /// All fragment text extracted and normalized, joined in reading order.
    pub fn all_text(&self) -> String {
        let texts: Vec<String> = self
            .fragments
            .iter()
            .map(|f| crate::text::html_to_text(&f.html))
            .filter(|t| !t.is_empty())
            .collect();
        texts.join("\n")
    }
}

/// Load an EPUB container. Failure here is fatal for the whole run.
pub fn parse_epub(path: &Path) -> Result<Book> {
    let mut doc =
        epub::doc::EpubDoc::new(path).map_err(|e| anyhow::anyhow!("Failed to open EPUB: {}", e))?;

    let title = doc
        .mdata("title")
        .map(|m| m.value.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let author = doc.mdata("creator").map(|m| m.value.clone());

    let toc = doc.toc.iter().map(convert_nav_point).collect();

    // Walk the spine in reading order, keeping the raw markup; text
    // extraction happens later, per detection strategy.
    let mut fragments = Vec::new();
    doc.set_current_chapter(0);
    let mut spine_order = 0;

    loop {
        let Some((html, _media_type)) = doc.get_current_str() else {
            break;
        };

        let href = doc.get_current_path().map_or_else(
            || format!("chapter_{spine_order}.xhtml"),
            |p| p.to_string_lossy().to_string(),
        );

        fragments.push(Fragment { href, html });

        if !doc.go_next() {
            break;
        }
        spine_order += 1;
    }

    Ok(Book {
        title,
        author,
        fragments,
        toc,
    })
}

/// Recursively convert a `NavPoint` into a `TocEntry`
fn convert_nav_point(nav_point: &epub::doc::NavPoint) -> TocEntry {
    TocEntry {
        title: nav_point.label.trim().to_string(),
        href: nav_point.content.to_string_lossy().to_string(),
        children: nav_point.children.iter().map(convert_nav_point).collect(),
    }
}
