//! Tool defaults with TOML file support.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use hashcash_types::Version;

/// Defaults read from `--config`. Command-line flags override every field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Digest algorithm name, e.g. "SHA1" or "SHA-256".
    #[serde(default = "default_hash_function")]
    pub hash_function: String,

    /// Bit target used when minting without `-b`.
    #[serde(default)]
    pub bits: Option<u32>,

    /// Stamp format version to mint.
    #[serde(default = "default_token_version")]
    pub token_version: u32,

    /// Extensions in `key=v1,v2` form, added to every minted stamp.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_hash_function() -> String {
    hashcash_work::DEFAULT_HASH_FUNCTION.to_string()
}

fn default_token_version() -> u32 {
    Version::default().as_u32()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            hash_function: default_hash_function(),
            bits: None,
            token_version: default_token_version(),
            extensions: Vec::new(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
