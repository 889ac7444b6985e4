//! Ordering & merge of per-chapter artifacts into one overview document.
//!
//! Artifact names often but not always embed a chapter number. If any
//! name carries a decimal numeral the collection is stably sorted by the
//! first numeral in each name; otherwise the input order is trusted, so a
//! naturally-ordered, non-numbered book (front matter, body, afterword)
//! is never silently reordered.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid numeral pattern"));

/// First decimal numeral embedded in the artifact's file name
fn first_numeral(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    NUMERAL.find(name).and_then(|m| m.as_str().parse().ok())
}

/// Display title derived from an artifact name: summary suffix stripped,
/// underscores replaced with spaces
pub fn display_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("untitled");
    let base = stem.strip_suffix("_summary").unwrap_or(stem);
    base.replace('_', " ")
}

/// Resolve the total order of the artifact collection.
///
/// Stable sort: artifacts with equal or missing numerals (missing = 0)
/// keep their input order.
pub fn order_artifacts(files: &[PathBuf]) -> Vec<PathBuf> {
    let has_numbering = files.iter().any(|f| first_numeral(f).is_some());

    let mut ordered = files.to_vec();
    if has_numbering {
        ordered.sort_by_key(|f| first_numeral(f).unwrap_or(0));
    }
    ordered
}

/// Merge the artifacts into a single document with a generated table of
/// contents, written to `output`.
///
/// Section headings are regenerated from the numbered index; heading
/// lines stored inside the artifacts are stripped. An artifact that
/// cannot be read keeps its section and numbering with an inline error
/// note instead of aborting the merge.
pub fn merge_artifacts(files: &[PathBuf], output: &Path) -> Result<()> {
    let ordered = order_artifacts(files);

    let mut merged = String::from("# Book Summary\n\n## Table of Contents\n\n");

    for (i, file) in ordered.iter().enumerate() {
        merged.push_str(&format!("{}. [{}](#{})\n", i + 1, display_title(file), i + 1));
    }
    merged.push('\n');

    for (i, file) in ordered.iter().enumerate() {
        merged.push_str(&format!("## {}. {}\n\n", i + 1, display_title(file)));

        match std::fs::read_to_string(file) {
            Ok(content) => {
                let body: Vec<&str> = content
                    .lines()
                    .filter(|line| !line.trim_start().starts_with('#'))
                    .collect();
                merged.push_str(body.join("\n").trim());
                merged.push_str("\n\n");
            }
            Err(e) => {
                log::warn!("failed to read artifact {}: {}", file.display(), e);
                merged.push_str(&format!("Could not read summary content: {}\n\n", e));
            }
        }
    }

    std::fs::write(output, merged)
        .with_context(|| format!("Failed to write merged document {}", output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_numbered_artifacts_sorted_by_first_numeral() {
        let ordered = order_artifacts(&paths(&[
            "ch1_summary.md",
            "ch3_summary.md",
            "ch2_summary.md",
        ]));
        let names: Vec<_> = ordered.iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["ch1_summary.md", "ch2_summary.md", "ch3_summary.md"]
        );
    }

    #[test]
    fn test_unnumbered_artifacts_keep_input_order() {
        let input = paths(&["intro_summary.md", "body_summary.md", "afterword_summary.md"]);
        assert_eq!(order_artifacts(&input), input);
    }

    #[test]
    fn test_numeral_less_names_sort_as_zero() {
        let ordered = order_artifacts(&paths(&["ch2.md", "preface.md", "ch1.md"]));
        let names: Vec<_> = ordered.iter().map(|p| p.to_str().unwrap()).collect();
        // preface has no numeral, sorts as 0 ahead of the numbered chapters
        assert_eq!(names, vec!["preface.md", "ch1.md", "ch2.md"]);
    }

    #[test]
    fn test_first_numeral_wins() {
        assert_eq!(first_numeral(Path::new("vol2_ch13.md")), Some(2));
        assert_eq!(first_numeral(Path::new("afterword.md")), None);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(
            display_title(Path::new("Chapter_1_Arrival_summary.md")),
            "Chapter 1 Arrival"
        );
        assert_eq!(display_title(Path::new("intro.md")), "intro");
    }

    #[test]
    fn test_merge_strips_artifact_headings() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("ch1_summary.md");
        std::fs::write(&a, "# ch1 Summary\n\nThe actual summary.").unwrap();
        let output = dir.path().join("summary.md");

        merge_artifacts(&[a], &output).unwrap();
        let merged = std::fs::read_to_string(&output).unwrap();

        assert!(merged.contains("1. [ch1](#1)"));
        assert!(merged.contains("## 1. ch1\n\nThe actual summary."));
        assert!(!merged.contains("# ch1 Summary"));
    }

    #[test]
    fn test_merge_survives_unreadable_artifact() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("ch1_summary.md");
        let missing = dir.path().join("ch2_summary.md");
        let c = dir.path().join("ch3_summary.md");
        std::fs::write(&a, "First summary.").unwrap();
        std::fs::write(&c, "Third summary.").unwrap();
        let output = dir.path().join("summary.md");

        merge_artifacts(&[a, missing, c], &output).unwrap();
        let merged = std::fs::read_to_string(&output).unwrap();

        // Section and numbering preserved, failure surfaced inline
        assert!(merged.contains("## 1. ch1\n\nFirst summary."));
        assert!(merged.contains("## 2. ch2\n\nCould not read summary content:"));
        assert!(merged.contains("## 3. ch3\n\nThird summary."));
    }

    #[test]
    fn test_merged_index_order_matches_sections() {
        let dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for name in ["ch2_summary.md", "ch1_summary.md"] {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("Body of {}.", name)).unwrap();
            files.push(path);
        }
        let output = dir.path().join("summary.md");

        merge_artifacts(&files, &output).unwrap();
        let merged = std::fs::read_to_string(&output).unwrap();

        assert!(merged.contains("1. [ch1](#1)"));
        assert!(merged.contains("2. [ch2](#2)"));
        let ch1_pos = merged.find("## 1. ch1").unwrap();
        let ch2_pos = merged.find("## 2. ch2").unwrap();
        assert!(ch1_pos < ch2_pos);
    }
}
