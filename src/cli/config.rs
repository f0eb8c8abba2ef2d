//! TOML configuration file support for repeated runs.
//!
//! Instead of passing the same flags every time, settings can live in a file:
//!
//! ```toml
//! # smash-analyze.toml
//! [run]
//! analysis = "particle_count"
//! quantities = ["pdg_id", "px", "py"]
//! save_path = "particle_count.json"
//! print = true
//! ```
//!
//! Command-line flags take precedence over values from the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for smash-analyze.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings for the run command.
    #[serde(default)]
    pub run: RunConfig,
}

/// Configuration for the run command.
#[derive(Debug, Default, Deserialize)]
pub struct RunConfig {
    /// Analysis name.
    pub analysis: Option<String>,

    /// Quantities to decode.
    pub quantities: Option<Vec<String>>,

    /// Where to save the result.
    pub save_path: Option<PathBuf>,

    /// Print the result summary.
    pub print: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
