//! `.brrr-scrub.toml` configuration file support.
//!
//! Provides deserialization, discovery (walk up to `.git` root), and
//! conversion into a [`ScrubConfig`]. CLI flags always take precedence over
//! file config.
//!
//! # Example config
//!
//! ```toml
//! [roots]
//! names = ["pm", "postman"]
//!
//! [fallback]
//! line_scan = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scrub::{RootBindings, ScrubConfig, DEFAULT_ROOTS};

/// Name of the config file.
pub const CONFIG_FILE_NAME: &str = ".brrr-scrub.toml";

/// Top-level `.brrr-scrub.toml` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScrubFileConfig {
    /// Global names of the foreign scripting API.
    #[serde(default)]
    pub roots: RootsConfig,

    /// Line-scan fallback for scripts that only parse loosely.
    #[serde(default)]
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RootsConfig {
    /// Exactly two identifiers.
    #[serde(default = "default_root_names")]
    pub names: Vec<String>,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            names: default_root_names(),
        }
    }
}

fn default_root_names() -> Vec<String> {
    DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    #[serde(default)]
    pub line_scan: bool,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl ScrubFileConfig {
    /// Parse a `.brrr-scrub.toml` file from a string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Parse)
    }

    /// Load and validate a `.brrr-scrub.toml` file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate constraints the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        root_bindings(&self.roots.names).map(|_| ())
    }

    /// Pipeline options described by this file.
    pub fn to_scrub_config(&self) -> Result<ScrubConfig, ConfigError> {
        Ok(ScrubConfig {
            roots: root_bindings(&self.roots.names)?,
            line_scan_fallback: self.fallback.line_scan,
        })
    }

    /// Default `.brrr-scrub.toml` contents.
    pub fn default_toml() -> &'static str {
        r#"# brrr-scrub configuration file

# Global bindings of the foreign scripting API. Statements that depend on
# either name (directly or through aliases) are commented out.
[roots]
names = ["pm", "postman"]

# When a script only parses with error recovery and no statement could be
# attributed to the roots, flag every line that mentions an alias by name.
[fallback]
line_scan = false
"#
    }
}

// ---------------------------------------------------------------------------
// Config file discovery
// ---------------------------------------------------------------------------

/// Discover a `.brrr-scrub.toml` by walking up from `start_dir` to the
/// repository root (directory containing `.git`).
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = if start_dir.is_file() {
        start_dir.parent()?.to_path_buf()
    } else {
        start_dir.to_path_buf()
    };

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Discover and load the config file. `Ok(None)` if there is none.
pub fn discover_and_load_config(
    start_dir: &Path,
) -> Result<Option<(ScrubFileConfig, PathBuf)>, ConfigError> {
    match discover_config(start_dir) {
        Some(path) => {
            let config = ScrubFileConfig::load(&path)?;
            Ok(Some((config, path)))
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Whether `name` is a plain ECMAScript identifier (ASCII subset).
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Build root bindings from a user-supplied name list.
pub fn root_bindings(names: &[String]) -> Result<RootBindings, ConfigError> {
    let [primary, secondary] = names else {
        return Err(ConfigError::RootCount(names.len()));
    };
    for name in [primary, secondary] {
        if !is_valid_identifier(name) {
            return Err(ConfigError::InvalidRoot(name.clone()));
        }
    }
    if primary == secondary {
        return Err(ConfigError::DuplicateRoot(primary.clone()));
    }
    Ok(RootBindings::new(primary.as_str(), secondary.as_str()))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from config file operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(toml::de::Error),

    #[error("expected exactly 2 root names, got {0}")]
    RootCount(usize),

    #[error("invalid root name '{0}' (must be a JavaScript identifier)")]
    InvalidRoot(String),

    #[error("root names must differ, got '{0}' twice")]
    DuplicateRoot(String),
}

// =========================================================================
// Tests
// =========================================================================
