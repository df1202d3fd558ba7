//! Configuration for the level extraction pipeline

use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};

/// Upper bound on `history_window_days` (about ten years)
pub const MAX_HISTORY_WINDOW_DAYS: u32 = 3650;

/// Configuration for level extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// How many of the highest-scoring strikes become levels
    /// Default: 15
    pub top_strikes_count: usize,

    /// Strikes need |gex_vol| + |gex_oi| strictly above this
    /// Default: 50.0
    pub noise_threshold: f64,

    /// Hotspots need |change| strictly above this
    /// Default: 10.0
    pub hotspot_threshold: f64,

    /// How many leading `max_priors` entries are considered
    /// Default: 3
    pub hotspot_count: usize,

    /// Interval name per `max_priors` index (index 0 = most recent)
    /// Default: ["1min", "5min", "10min"]
    pub hotspot_intervals: Vec<String>,

    /// Trailing calendar days for history replication (W, giving W+1 dates)
    /// Default: 30
    pub history_window_days: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            top_strikes_count: 15,
            noise_threshold: 50.0,
            hotspot_threshold: 10.0,
            hotspot_count: 3,
            hotspot_intervals: vec!["1min".into(), "5min".into(), "10min".into()],
            history_window_days: 30,
        }
    }
}

impl LevelConfig {
    /// Lower thresholds, more strikes
    pub fn aggressive() -> Self {
        Self {
            top_strikes_count: 25,
            noise_threshold: 20.0,
            hotspot_threshold: 5.0,
            ..Default::default()
        }
    }

    /// Higher thresholds, fewer strikes
    pub fn conservative() -> Self {
        Self {
            top_strikes_count: 8,
            noise_threshold: 150.0,
            hotspot_threshold: 25.0,
            ..Default::default()
        }
    }

    /// Interval label for a `max_priors` index
    pub fn interval_name(&self, index: usize) -> String {
        self.hotspot_intervals
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("{}-interval", index))
    }

    pub fn validate(&self) -> GexResult<()> {
        for (name, value) in [
            ("noise_threshold", self.noise_threshold),
            ("hotspot_threshold", self.hotspot_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GexError::configuration(format!(
                    "{} must be a finite, non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.history_window_days > MAX_HISTORY_WINDOW_DAYS {
            return Err(GexError::configuration(format!(
                "history_window_days must be at most {}, got {}",
                MAX_HISTORY_WINDOW_DAYS, self.history_window_days
            )));
        }
        Ok(())
    }
}

/// Index ticker → futures contract mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMapping {
    /// Target futures symbol, e.g. "ES"
    pub target: String,
    /// Index price / futures price
    pub ratio: f64,
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl TickerMapping {
    pub fn new(target: impl Into<String>, ratio: f64, name: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ratio,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> GexResult<()> {
        if self.target.trim().is_empty() {
            return Err(GexError::configuration("target symbol is empty"));
        }
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(GexError::configuration(format!(
                "ratio for {} must be strictly positive, got {}",
                self.target, self.ratio
            )));
        }
        Ok(())
    }
}
