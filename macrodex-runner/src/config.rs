//! TOML report configuration.
//!
//! ```toml
//! [sources]
//! fed_balance_sheet = { path = "data/walcl.csv", scale = 0.001 }
//! treasury_account = { path = "data/wtregen.csv" }
//! reverse_repo = { path = "data/rrpontsyd.csv" }
//! pmi = { path = "data/pmi.csv", note = "ISM manufacturing" }
//! price = { path = "data/btc.csv" }
//!
//! [history]
//! start_date = "2023-01-01"
//! end_date = "2024-12-31"
//! step_days = 7
//! lookback_days = 365
//! price_window = 30
//! ```

use chrono::NaiveDate;
use macrodex_core::HistoryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub history: HistorySettings,
}

/// One CSV input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Multiplier applied to every value on load (unit harmonisation).
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Free-form provenance note, carried onto PMI snapshots.
    #[serde(default)]
    pub note: Option<String>,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub fed_balance_sheet: SourceFile,
    pub treasury_account: SourceFile,
    pub reverse_repo: SourceFile,
    pub pmi: SourceFile,
    pub price: SourceFile,
}

/// Longest accepted normalization window (100 years).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// History window settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// First timeline date. Defaults to the first date all sources cover.
    pub start_date: Option<NaiveDate>,
    /// Last timeline date. Defaults to the latest observation.
    pub end_date: Option<NaiveDate>,
    pub step_days: u32,
    pub lookback_days: u32,
    pub price_window: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        let core = HistoryConfig::default();
        Self {
            start_date: None,
            end_date: None,
            step_days: 7,
            lookback_days: core.lookback_days,
            price_window: core.price_window,
        }
    }
}

impl HistorySettings {
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            lookback_days: self.lookback_days,
            price_window: self.price_window,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_days == 0 {
            return Err(ConfigError::Invalid("history.step_days must be >= 1".into()));
        }
        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "history.lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        if self.price_window == 0 {
            return Err(ConfigError::Invalid(
                "history.price_window must be >= 1".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "history.start_date {start} is after end_date {end}"
                )));
            }
        }
        Ok(())
    }
}

impl ReportConfig {
    /// Load from a TOML file. Relative source paths resolve against the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.history.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for source in [
            &mut self.sources.fed_balance_sheet,
            &mut self.sources.treasury_account,
            &mut self.sources.reverse_repo,
            &mut self.sources.pmi,
            &mut self.sources.price,
        ] {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }
}
