//! Demo configuration
//!
//! Every field has a default matching the classic `./data/` layout, so the
//! configuration file is optional.  Its path is taken from the
//! `RUSTY_MERGE_CONFIG` environment variable, falling back to
//! `rusty-merge.json` in the working directory.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::data::{KeyPolicy, LoadOptions};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "RUSTY_MERGE_CONFIG";

/// Configuration file used when [`CONFIG_ENV`] is unset
pub const DEFAULT_CONFIG_FILE: &str = "rusty-merge.json";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Archive holding the fragment files
    pub archive: PathBuf,

    /// Directory the archive is extracted to and fragments are read from
    pub data_dir: PathBuf,

    pub key_column: String,
    pub extension: String,
    pub delimiter: char,
    pub key_policy: KeyPolicy,

    /// Key whose index record the demo prints
    pub sample_key: i64,

    /// Rows shown for table previews
    pub head_rows: usize,

    /// Rows shown for ranked listings
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("./data/TMDB.zip"),
            data_dir: PathBuf::from("./data/"),
            key_column: "id".to_string(),
            extension: "csv".to_string(),
            delimiter: ',',
            key_policy: KeyPolicy::Strict,
            sample_key: 60140,
            head_rows: 5,
            top_n: 20,
        }
    }
}

impl Config {
    /// Load from the configured file, or defaults if there is none
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_file_if_exists(&path)
    }

    pub fn from_file_if_exists(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {:?}",
            self.delimiter
        );
        ensure!(!self.key_column.is_empty(), "key column name must not be empty");
        Ok(())
    }

    /// Options for the loader and the index
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            key_column: self.key_column.clone(),
            extension: self.extension.trim_start_matches('.').to_string(),
            delimiter: self.delimiter as u8,
            key_policy: self.key_policy,
        }
    }
}
