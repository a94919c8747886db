//! Configuration
//!
//! Loaded from an optional TOML file, then overridden by `JOURNAL__*`
//! environment variables (after `.env` is read).

use crate::capital::Capital;
use crate::error::Result;
use crate::format::{SUMMARY_PRECISION, TRADE_LOG_PRECISION};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Capital used when the journal file does not exist yet
    #[serde(default)]
    pub capital: Capital,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            autosave: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_trade_log_precision")]
    pub trade_log_precision: usize,
    #[serde(default = "default_summary_precision")]
    pub summary_precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            trade_log_precision: TRADE_LOG_PRECISION,
            summary_precision: SUMMARY_PRECISION,
        }
    }
}

fn default_store_path() -> String {
    "data/journal.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_trade_log_precision() -> usize {
    TRADE_LOG_PRECISION
}

fn default_summary_precision() -> usize {
    SUMMARY_PRECISION
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("JOURNAL").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
