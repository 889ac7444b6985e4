//! epub-digest - Split an EPUB into chapters, summarize each through an
//! OpenAI-compatible API, and merge the summaries into one overview.

mod artifact;
mod config;
mod epub;
mod merge;
mod segment;
mod text;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use config::DigestConfig;
use indicatif::{ProgressBar, ProgressStyle};
use segment::DetectionMethod;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use summarizer::{OpenAiProvider, Summarizer};

#[derive(Parser, Debug)]
#[command(name = "epub-digest")]
#[command(about = "Split an EPUB into chapters, summarize each, and merge into one overview", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the EPUB file
    epub_file: Option<PathBuf>,

    /// Output directory for chapter and summary files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Chapter detection method
    #[arg(short, long, value_enum, default_value = "auto")]
    method: DetectionMethod,

    /// List detectable chapters and exit
    #[arg(long)]
    list: bool,

    /// Chapter range to process from the detected list (e.g., "0-10")
    #[arg(long)]
    chapters: Option<String>,

    /// Skip summarization and merge the raw chapter files instead
    #[arg(long)]
    skip_summary: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the API base URL
    SetApiBase {
        /// Base URL of the OpenAI-compatible API
        url: String,
    },
    /// Set the API key
    SetApiKey {
        /// API key value
        key: String,
    },
    /// Set the model identifier
    SetModel {
        /// Model name (e.g., gpt-4o-mini)
        model: String,
    },
    /// Set the summarization system prompt
    SetPrompt {
        /// Prompt text
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let epub_path = args.epub_file.clone().ok_or_else(|| {
        anyhow::anyhow!("EPUB file path is required. Run 'epub-digest --help' for usage.")
    })?;

    if !epub_path.exists() {
        bail!("EPUB file not found: {}", epub_path.display());
    }

    let config = DigestConfig::load().context("Failed to load configuration")?;

    eprintln!("Parsing EPUB: {}", epub_path.display());
    let book = epub::parse_epub(&epub_path).context("Failed to parse EPUB")?;

    eprintln!(
        "Book: \"{}\" by {}",
        book.title,
        book.author.as_deref().unwrap_or("Unknown")
    );

    if args.list {
        return list_chapters(&book, args.method);
    }

    // Segment: an explicit range selects from the enumerated choice set,
    // otherwise the splitting path (with fallback only in auto mode) runs.
    let chapters = if args.chapters.is_some() {
        let all = segment::enumerate_chapters(&book, args.method);
        let (start, end) = parse_chapter_range(&args.chapters, all.len())?;
        all[start..end].to_vec()
    } else {
        segment::split_into_chapters(&book, args.method)
    };

    if chapters.is_empty() {
        bail!("No chapters found in EPUB");
    }
    eprintln!("Chapters: {}", chapters.len());

    // Persist chapter artifacts; a failed write drops that chapter only.
    let mut chapter_files = Vec::new();
    let mut write_failures = 0usize;
    for chapter in &chapters {
        match artifact::write_chapter(&args.output, chapter) {
            Ok(path) => chapter_files.push(path),
            Err(e) => {
                log::warn!("failed to write chapter '{}': {:#}", chapter.title, e);
                write_failures += 1;
            }
        }
    }
    eprintln!(
        "Chapter files: {} written, {} failed",
        chapter_files.len(),
        write_failures
    );

    if chapter_files.is_empty() {
        bail!("No chapter files could be written");
    }

    let merge_inputs = if args.skip_summary {
        chapter_files.clone()
    } else {
        summarize_chapters(&config, &chapter_files).await?
    };

    if merge_inputs.is_empty() {
        bail!("Nothing to merge: every chapter failed");
    }

    let merged_path = args.output.join("summary.md");
    merge::merge_artifacts(&merge_inputs, &merged_path)?;
    eprintln!("Merged overview: {}", merged_path.display());

    Ok(())
}

/// Print the enumerated chapter choice set.
fn list_chapters(book: &epub::Book, method: DetectionMethod) -> Result<()> {
    let chapters = segment::enumerate_chapters(book, method);
    if chapters.is_empty() {
        bail!("No chapters found with any detection method");
    }

    for (i, chapter) in chapters.iter().enumerate() {
        println!(
            "{:>4}  {}{}  [{}]",
            i,
            "  ".repeat(chapter.level),
            chapter.title,
            chapter.href.as_deref().unwrap_or("")
        );
    }
    eprintln!("\n{} chapter(s)", chapters.len());
    Ok(())
}

/// Summarize each chapter file sequentially, one outstanding call at a
/// time. A chapter whose summarization or summary write fails is excluded
/// from the result; the batch always continues.
async fn summarize_chapters(
    config: &DigestConfig,
    chapter_files: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let provider = OpenAiProvider::new(&config.api_base, &config.api_key, &config.model)
        .map_err(|e| {
            anyhow::anyhow!(
                "{}\nSet it with 'epub-digest config set-api-base <url>' / 'set-api-key <key>'.",
                e
            )
        })?;
    let summarizer = Summarizer::new(Box::new(provider), &config.system_prompt);

    let pb = ProgressBar::new(chapter_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut summary_files = Vec::new();
    let mut failures = 0usize;

    for chapter_file in chapter_files {
        let name = chapter_file
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("unknown");
        pb.set_message(name.to_string());

        match summarize_one(&summarizer, chapter_file).await {
            Ok(path) => summary_files.push(path),
            Err(e) => {
                log::warn!("summarization failed for \"{}\": {:#}", name, e);
                failures += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("summaries complete");
    eprintln!(
        "Summaries: {} succeeded, {} failed",
        summary_files.len(),
        failures
    );

    Ok(summary_files)
}

async fn summarize_one(summarizer: &Summarizer, chapter_file: &Path) -> Result<PathBuf> {
    let content = std::fs::read_to_string(chapter_file)
        .with_context(|| format!("Failed to read {}", chapter_file.display()))?;
    let summary = summarizer.summarize(&content).await?;
    artifact::write_summary(chapter_file, &summary)
}

/// Parse a chapter range string like "0-10" or "5".
fn parse_chapter_range(range: &Option<String>, total: usize) -> Result<(usize, usize)> {
    match range {
        None => Ok((0, total)),
        Some(r) => {
            if r.contains('-') {
                let parts: Vec<&str> = r.split('-').collect();
                if parts.len() != 2 {
                    bail!("Invalid chapter range format. Use 'start-end' (e.g., '0-10')");
                }
                let start: usize = parts[0].parse().context("Invalid start chapter")?;
                let end: usize = parts[1].parse().context("Invalid end chapter")?;
                if end < start {
                    bail!("Chapter range end must not precede start");
                }
                Ok((start.min(total), (end + 1).min(total)))
            } else {
                let chapter: usize = r.parse().context("Invalid chapter number")?;
                Ok((chapter.min(total), (chapter + 1).min(total)))
            }
        }
    }
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = DigestConfig::load()?;
            println!("Configuration file: {:?}", DigestConfig::config_path()?);
            println!();
            println!("api_base = \"{}\"", config.api_base);
            println!(
                "api_key = \"{}\"",
                if config.api_key.is_empty() {
                    "(unset)"
                } else {
                    "****"
                }
            );
            println!("model = \"{}\"", config.model);
            println!("system_prompt = \"{}\"", config.system_prompt);
        }
        ConfigAction::SetApiBase { url } => {
            let mut config = DigestConfig::load()?;
            config.api_base = url.trim().to_string();
            config.save()?;
            println!("API base URL set to: {}", config.api_base);
        }
        ConfigAction::SetApiKey { key } => {
            let mut config = DigestConfig::load()?;
            config.api_key = key.trim().to_string();
            config.save()?;
            println!("API key updated");
        }
        ConfigAction::SetModel { model } => {
            let mut config = DigestConfig::load()?;
            config.model = model.trim().to_string();
            config.save()?;
            println!("Model set to: {}", config.model);
        }
        ConfigAction::SetPrompt { prompt } => {
            let mut config = DigestConfig::load()?;
            config.system_prompt = prompt.trim().to_string();
            config.save()?;
            println!("System prompt updated");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chapter_range_full() {
        assert_eq!(parse_chapter_range(&None, 10).unwrap(), (0, 10));
    }

    #[test]
    fn test_parse_chapter_range_span() {
        assert_eq!(
            parse_chapter_range(&Some("2-5".to_string()), 10).unwrap(),
            (2, 6)
        );
    }

    #[test]
    fn test_parse_chapter_range_single() {
        assert_eq!(
            parse_chapter_range(&Some("3".to_string()), 10).unwrap(),
            (3, 4)
        );
    }

    #[test]
    fn test_parse_chapter_range_clamped() {
        assert_eq!(
            parse_chapter_range(&Some("8-99".to_string()), 10).unwrap(),
            (8, 10)
        );
    }

    #[test]
    fn test_parse_chapter_range_invalid() {
        assert!(parse_chapter_range(&Some("a-b".to_string()), 10).is_err());
        assert!(parse_chapter_range(&Some("5-2".to_string()), 10).is_err());
    }
}
