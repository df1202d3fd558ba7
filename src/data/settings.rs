//! Application settings
//!
//! Loaded from a TOML file; every section falls back to defaults. The API
//! key is read from `GEXBOT_API_KEY` (a `.env` file is honoured).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::gexbot::DEFAULT_BASE_URL;
use crate::core::{GexError, GexResult};
use crate::levels::{LevelConfig, TickerMapping};

pub const API_KEY_ENV: &str = "GEXBOT_API_KEY";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    /// Index ticker → futures mapping, e.g. SPX → ES
    pub tickers: BTreeMap<String, TickerMapping>,
    pub levels: LevelConfig,
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let mut tickers = BTreeMap::new();
        tickers.insert(
            "SPX".to_string(),
            TickerMapping::new("ES", 10.0, "S&P 500 E-mini"),
        );
        tickers.insert(
            "NDX".to_string(),
            TickerMapping::new("NQ", 40.0, "Nasdaq 100 E-mini"),
        );

        Self {
            api: ApiSettings::default(),
            tickers,
            levels: LevelConfig::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Settings {
    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> GexResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> GexResult<Self> {
        let settings: Self =
            toml::from_str(contents).map_err(|e| GexError::Serialization(e.to_string()))?;
        settings.levels.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> GexResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                tracing::debug!("No settings file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml_string(&self) -> GexResult<String> {
        toml::to_string_pretty(self).map_err(|e| GexError::Serialization(e.to_string()))
    }

    pub fn mapping(&self, ticker: &str) -> Option<&TickerMapping> {
        self.tickers.get(ticker)
    }

    /// Mapping for `ticker`, or a configuration error naming it
    pub fn require_mapping(&self, ticker: &str) -> GexResult<&TickerMapping> {
        self.mapping(ticker).ok_or_else(|| {
            GexError::configuration(format!("no ticker mapping configured for {}", ticker))
        })
    }
}

/// GexBot API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Aggregation period segment of the URL ("full", "zero", "one")
    pub aggregation: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            aggregation: "full".to_string(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    /// Written after every run
    pub timestamp_file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            timestamp_file: "last_update.txt".to_string(),
        }
    }
}

impl OutputSettings {
    /// es_gex_levels.csv for "ES"
    pub fn levels_path(&self, target: &str) -> PathBuf {
        self.dir
            .join(format!("{}_gex_levels.csv", target.to_lowercase()))
    }

    pub fn timestamp_path(&self) -> PathBuf {
        self.dir.join(&self.timestamp_file)
    }
}

/// API key from the environment, after loading `.env`
pub fn api_key_from_env() -> Option<String> {
    dotenv::dotenv().ok();
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}
