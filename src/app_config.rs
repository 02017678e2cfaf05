use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Output format for distributed files
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Append broadcast lines to every actor's file
    #[serde(default = "default_true")]
    pub distribute_group: bool,

    /// Append multiple-actor and exclusion lines to actor files
    #[serde(default = "default_true")]
    pub distribute_multiple: bool,

    /// Save caption/sign lines into a dedicated ASS file
    #[serde(default = "default_true")]
    pub save_signs: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output encoding for distributed subtitle files
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: Native ASS script, sections preserved
    #[default]
    Ass,
    // @format: Simplified timed-caption SRT
    Srt,
}

impl OutputFormat {
    // @returns: File extension without the dot
    pub fn extension(&self) -> &str {
        match self {
            Self::Ass => "ass",
            Self::Srt => "srt",
        }
    }
}

// Implement Display trait for OutputFormat
impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// Implement FromStr trait for OutputFormat
impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ass" => Ok(Self::Ass),
            "srt" => Ok(Self::Srt),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Default config location in the per-user configuration directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rolesplit")
            .join("conf.json")
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        // All flag combinations are legal; nothing beyond deserialization
        // can be inconsistent today. Kept as the single validation seam.
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_format: OutputFormat::default(),
            distribute_group: true,
            distribute_multiple: true,
            save_signs: true,
            log_level: LogLevel::default(),
        }
    }
}
