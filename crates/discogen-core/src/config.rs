//! Configuration management for batch client generation.
//!
//! This module defines the `Config` struct for driving generation of several
//! clients in one run. The configuration can be loaded from a YAML file or
//! created programmatically.
//!
//! # Examples
//!
//! ```no_run
//! use discogen_core::config::Config;
//!
//! let mut config = Config::new("clients");
//! config.apis.push("bigquery:v2".to_string());
//! config.apis.push("spanner:v1".to_string());
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Configuration for batch client generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output directory for generated modules
    pub output_dir: String,

    /// Base URL embedded in each module's `Source:` header line; the
    /// document's own URL is used when absent
    #[serde(default)]
    pub self_url_base: Option<String>,

    /// APIs to generate, as `name:version` pairs
    #[serde(default)]
    pub apis: Vec<String>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            self_url_base: None,
            apis: Vec::new(),
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
