//! Text extraction and normalization.
//!
//! `html_to_text` strips markup (dropping script/style subtrees) and
//! `normalize` collapses layout whitespace into a canonical plain-text form.
//! Both are pure functions; detectors rely on `normalize` being idempotent.

use scraper::{ElementRef, Html};

/// Extract the visible text of an HTML fragment, normalized.
///
/// Script and style content never appears in the output. Reading order
/// follows document order of the text nodes.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    normalize(&raw)
}

fn collect_text(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if name == "script" || name == "style" {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Normalize raw extracted text.
///
/// Lines are trimmed, runs of two or more spaces within a line split into
/// separately trimmed phrases, empty results dropped, and the survivors
/// rejoined with single newlines. Paragraph breaks expressed as separate
/// lines survive; visual alignment whitespace does not.
pub fn normalize(text: &str) -> String {
    let mut parts = Vec::new();

    for line in text.lines() {
        for phrase in line.trim().split("  ") {
            let phrase = phrase.trim();
            if !phrase.is_empty() {
                parts.push(phrase);
            }
        }
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        // A single interior space survives; runs of two or more split.
        let text = "  First line  \n\n   Second    line\n\t\n";
        assert_eq!(normalize(text), "First line\nSecond\nline");
    }

    #[test]
    fn test_normalize_preserves_single_spaces() {
        assert_eq!(normalize("one two three"), "one two three");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n \n\t "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let text = "Title   with    gaps\n\n  body text  ";
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_html_to_text_strips_tags() {
        let html = "<html><body><h1>Title</h1>\n<p>One paragraph.</p>\n<p>Another.</p></body></html>";
        assert_eq!(html_to_text(html), "Title\nOne paragraph.\nAnother.");
    }

    #[test]
    fn test_html_to_text_drops_script_and_style() {
        let html = "<html><head><style>p { color: red; }</style></head>\
                    <body><script>var x = 1;</script><p>Visible</p></body></html>";
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn test_html_to_text_empty_document() {
        assert_eq!(html_to_text(""), "");
    }

    proptest! {
        #[test]
        fn normalize_idempotent(s in "[a-zA-Z0-9 \\t\\n]{0,300}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
