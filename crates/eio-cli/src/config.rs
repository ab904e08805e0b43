//! TOML settings file for the `eio` tool.
//!
//! Every field has a default, so a missing file and an empty file both yield
//! [`CliConfig::default()`]:
//!
//! ```toml
//! log_level = "info"
//!
//! [limits]
//! max_body_size = 1048576
//! ```
//!
//! Leaving out `max_body_size` keeps decoding unbounded.  Command-line flags
//! override whatever the file says; that merge happens in `main.rs`.

use std::path::{Path, PathBuf};

use eio_core::FrameLimits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `init_config` found a file already present and was not told to
    /// overwrite it.
    #[error("config already exists at {0}")]
    AlreadyExists(PathBuf),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Settings read from the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// `tracing` filter used when `RUST_LOG` is unset: `"error"`, `"warn"`,
    /// `"info"`, `"debug"`, `"trace"`, or a full directive string.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bounds applied when decoding frames.
    #[serde(default)]
    pub limits: FrameLimits,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            limits: FrameLimits::default(),
        }
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads the config at `path`, returning [`CliConfig::default()`] if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<CliConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CliConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path` as pretty TOML, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &CliConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes [`CliConfig::default()`] to `path` and returns it.
///
/// An existing file is only replaced when `force` is set.
///
/// # Errors
///
/// Returns [`ConfigError::AlreadyExists`] if `path` exists and `force` is
/// `false`, otherwise whatever [`save_config`] returns.
pub fn init_config(path: &Path, force: bool) -> Result<CliConfig, ConfigError> {
    if !force && path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let config = CliConfig::default();
    save_config(path, &config)?;
    Ok(config)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
