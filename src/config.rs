//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `--config <PATH>` or `$NETIQUETTE_CONFIG`
//! 2. `~/.config/netiquette/config.toml` (Linux/macOS)
//!    `%APPDATA%\netiquette\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Limits and switches used by the rules.
    pub rules: RulesConfig,
    /// File processing policy.
    pub run: RunConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "off", "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,
}

/// Limits and switches shared by the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum subject length in characters.
    pub max_subject_length: usize,
    /// Width above which a line must be quoted.
    pub line_width: usize,
    /// Width no line may exceed (citation lines excepted).
    pub max_line_width: usize,
    /// Minimum number of body lines, signature included.
    pub min_body_lines: usize,
    /// Maximum number of lines after the signature delimiter.
    pub max_signature_lines: usize,
    /// Reject subjects carrying a single tag.
    pub strict_subject: bool,
    /// Require the first quote section to be preceded by an attribution line.
    pub require_attribution: bool,
}

/// File processing policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Keep going after a non-compliant file.
    pub process_all_files: bool,
    /// Skip unreadable or missing files instead of aborting.
    pub ignore_missing_file: bool,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "error".to_string(),
            log_file: None,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_subject_length: 80,
            line_width: 72,
            max_line_width: 80,
            min_body_lines: 8,
            max_signature_lines: 4,
            strict_subject: false,
            require_attribution: false,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// An explicit `path` takes precedence over the environment and the
/// standard config directory. Returns the default configuration if no
/// file is found or on parse error.
pub fn load_config(path: Option<&Path>) -> Config {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => config_file_path(),
    };
    if let Some(path) = path {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to `path`, or to the standard location.
pub fn save_config(config: &Config, path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("NETIQUETTE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("netiquette").join("config.toml"))
}
