//! Chapter artifact persistence.
//!
//! Each chapter becomes one immutable markdown file named after its title;
//! summaries sit next to them with a `_summary` suffix on the base name.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::segment::Chapter;

/// Clean a title for use as a file name by replacing invalid characters
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Generate a unique path by adding a numeric suffix if needed
fn get_unique_path(target: &Path) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }

    let stem = target.file_stem().and_then(OsStr::to_str).unwrap_or("");
    let ext = target.extension().and_then(OsStr::to_str).unwrap_or("md");
    let parent = target.parent().unwrap_or(Path::new("."));

    for i in 1u32.. {
        let candidate = parent.join(format!("{} ({}).{}", stem, i, ext));
        if !candidate.exists() {
            return candidate;
        }
    }

    // Fallback (should never reach here)
    target.to_path_buf()
}

/// Write one chapter as a markdown artifact in the output directory.
///
/// The file carries the title as a heading followed by the body. Titles
/// that collide after sanitization get a numeric suffix so no artifact is
/// ever overwritten within a run.
pub fn write_chapter(output_dir: &Path, chapter: &Chapter) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let safe_title = sanitize_filename(&chapter.title);
    let path = get_unique_path(&output_dir.join(format!("{}.md", safe_title)));

    let body = format!("# {}\n\n{}", chapter.title, chapter.content);
    std::fs::write(&path, body)
        .with_context(|| format!("Failed to write chapter file {}", path.display()))?;

    Ok(path)
}

/// Path of the summary artifact paired with a chapter artifact
pub fn summary_path(chapter_path: &Path) -> PathBuf {
    let stem = chapter_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("chapter");
    chapter_path.with_file_name(format!("{}_summary.md", stem))
}

/// Write the summary artifact next to its chapter artifact
pub fn write_summary(chapter_path: &Path, summary: &str) -> Result<PathBuf> {
    let path = summary_path(chapter_path);
    let stem = chapter_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("chapter");

    let body = format!("# {} Summary\n\n{}", stem, summary);
    std::fs::write(&path, body)
        .with_context(|| format!("Failed to write summary file {}", path.display()))?;

    Ok(path)
}
