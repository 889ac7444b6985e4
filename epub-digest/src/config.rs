//! epub-digest configuration management.
//!
//! Credentials and the summarization prompt live in a TOML file; they are
//! read once per run and injected into the summarizer at construction.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SYSTEM_PROMPT: &str =
    "Summarize the core plot of this book chapter, keeping the key characters and conflicts.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Base URL of the OpenAI-compatible API (without the /v1 suffix)
    #[serde(default)]
    pub api_base: String,

    /// API key; empty means not configured
    #[serde(default)]
    pub api_key: String,

    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt for chapter summarization
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            model: default_model(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl DigestConfig {
    /// Get the config file path: ~/.config/epub-digest/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("epub-digest")
            .join("config.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: DigestConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DigestConfig::default();
        assert!(config.api_base.is_empty());
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.system_prompt.contains("Summarize"));
    }

    #[test]
    fn test_config_path() {
        let path = DigestConfig::config_path();
        assert!(path.is_ok());
        assert!(path.unwrap().ends_with("epub-digest/config.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
api_base = "https://api.example.com"
api_key = "sk-test"
model = "gpt-4o-mini"
system_prompt = "Be brief."
"#;
        let config: DigestConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.system_prompt, "Be brief.");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: DigestConfig = toml::from_str("").unwrap();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.api_base.is_empty());
    }

    #[test]
    fn test_config_round_trip() {
        let config = DigestConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: DigestConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.system_prompt, config.system_prompt);
    }
}
