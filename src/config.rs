//! Extraction settings loaded from a TOML file.
//!
//! ```toml
//! dump = true
//! format = "json"
//! log_filter = "loopnest_graph=debug"
//! ```

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The flat binary buffer.
    #[default]
    Binary,
    /// The flat tables as JSON.
    Json,
    /// Graphviz rendering of the tree.
    Dot,
}

/// Settings for one extraction run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Write the human-readable rendering to stdout.
    pub dump: bool,
    pub format: OutputFormat,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            dump: false,
            format: OutputFormat::Binary,
            log_filter: "info".to_string(),
        }
    }
}

impl ExtractConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(|e| ExtractError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}
