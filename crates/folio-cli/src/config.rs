//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables (including a `.env` file)
//! - Command-line arguments

use crate::error::{Error, Result};
use folio_core::sink::SanityConfig;
use folio_core::{HoneypotDetector, DEFAULT_HONEYPOT_FIELD};
use folio_server::ServerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which sink receives accepted submissions
    pub sink: SinkConfig,

    /// Sanity project settings
    pub sanity: SanityConfig,

    /// HTTP listener settings
    pub server: ServerConfig,

    /// Form settings
    pub form: FormConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Persistence sink kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Sanity,
    Jsonl,
    Memory,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SinkKind::Sanity => "sanity",
            SinkKind::Jsonl => "jsonl",
            SinkKind::Memory => "memory",
        };
        f.write_str(label)
    }
}

impl FromStr for SinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sanity" => Ok(SinkKind::Sanity),
            "jsonl" => Ok(SinkKind::Jsonl),
            "memory" => Ok(SinkKind::Memory),
            other => Err(Error::config(format!(
                "Unknown sink '{}'; expected sanity, jsonl or memory",
                other
            ))),
        }
    }
}

/// Sink selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,

    /// File used by the jsonl sink
    pub jsonl_path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            jsonl_path: PathBuf::from("contact-submissions.jsonl"),
        }
    }
}

/// Form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Name of the hidden honeypot field
    pub honeypot_field: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            honeypot_field: DEFAULT_HONEYPOT_FIELD.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file, picking the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "toml, yaml or json".to_string(),
                })
            }
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations,
    /// then apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.merge_with_env()?;
        Ok(config)
    }

    /// First default location that exists
    pub fn locate() -> Option<PathBuf> {
        Self::default_config_paths()
            .into_iter()
            .find(|path| path.exists())
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".folio.toml"),
            PathBuf::from("folio.toml"),
            PathBuf::from("folio.yaml"),
            PathBuf::from("folio.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("folio").join("config.toml"));
        }

        paths
    }

    /// Apply environment variable overrides
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.sanity.merge_with_env();

        if let Some(bind) = non_empty_env("FOLIO_BIND") {
            self.server.bind = bind;
        }
        if let Some(kind) = non_empty_env("FOLIO_SINK") {
            self.sink.kind = kind.parse()?;
        }
        if let Some(path) = non_empty_env("FOLIO_JSONL_PATH") {
            self.sink.jsonl_path = PathBuf::from(path);
        }
        if let Some(field) = non_empty_env("FOLIO_HONEYPOT_FIELD") {
            self.form.honeypot_field = field;
        }
        Ok(())
    }

    /// Detector for the configured honeypot field
    pub fn honeypot_detector(&self) -> Result<HoneypotDetector> {
        HoneypotDetector::new(self.form.honeypot_field.as_str()).map_err(|_| {
            Error::config(format!(
                "form.honeypot_field '{}' must be non-empty and not a visible form field",
                self.form.honeypot_field
            ))
        })
    }

    /// Check that the selected sink can be built
    pub fn validate(&self) -> Result<()> {
        self.honeypot_detector()?;
        if self.server.max_body_bytes == 0 {
            return Err(Error::config("server.max_body_bytes must be greater than zero"));
        }
        self.server.socket_addr().map_err(|e| Error::config(e.to_string()))?;

        match self.sink.kind {
            SinkKind::Sanity => self.sanity.validate()?,
            SinkKind::Jsonl => {
                if self.sink.jsonl_path.as_os_str().is_empty() {
                    return Err(Error::config(
                        "sink.jsonl_path must be set for the jsonl sink",
                    ));
                }
            }
            SinkKind::Memory => {}
        }
        Ok(())
    }

    /// Save configuration to a file, picking the format by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Builder for creating configurations programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn sink(mut self, kind: SinkKind) -> Self {
        self.config.sink.kind = kind;
        self
    }

    #[allow(dead_code)]
    pub fn jsonl_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sink.jsonl_path = path.into();
        self
    }

    #[allow(dead_code)]
    pub fn sanity(mut self, sanity: SanityConfig) -> Self {
        self.config.sanity = sanity;
        self
    }

    #[allow(dead_code)]
    pub fn bind(mut self, bind: impl Into<String>) -> Self {
        self.config.server.bind = bind.into();
        self
    }

    #[allow(dead_code)]
    pub fn honeypot_field(mut self, field: impl Into<String>) -> Self {
        self.config.form.honeypot_field = field.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
