//! Pattern-based chapter detection over normalized flat text.
//!
//! Operates line by line: a line fully matching the chapter-title grammar
//! opens a new chapter, everything up to the next match is its content.

use std::sync::LazyLock;

use regex::Regex;

use super::Chapter;

/// Chapter-title line grammar: optional leading label, a chapter/volume
/// marker in CJK or Latin numeral form, optional trailing title text.
/// Anchored to the whole line, case-insensitive. ASCII and ideographic
/// spaces both count as separators.
static CHAPTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(.+[ 　]+)|())(第[一二三四五六七八九十零〇百千万两0123456789]+[章卷]|卷[一二三四五六七八九十零〇百千万两0123456789]+|chapter\.?|vol(?:ume)?\.?|book|bk)(?:[ 　]+(?:\S.*)?)?[ 　]*$",
    )
    .expect("valid chapter line pattern")
});

/// Detect chapters in normalized flat text.
///
/// Lines before the first matching heading are front matter and are
/// discarded. No match at all yields an empty list.
pub fn detect(text: &str) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    let mut current_title: Option<String> = None;
    let mut current_content: Vec<&str> = Vec::new();

    for line in text.lines() {
        if CHAPTER_LINE.is_match(line) {
            if let Some(title) = current_title.take() {
                chapters.push(Chapter::new(title, current_content.join("\n")));
                current_content.clear();
            }
            current_title = Some(line.trim().to_string());
        } else if current_title.is_some() {
            current_content.push(line);
        }
    }

    if let Some(title) = current_title {
        chapters.push(Chapter::new(title, current_content.join("\n")));
    }

    chapters
}
