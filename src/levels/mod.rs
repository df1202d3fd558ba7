//! Level extraction from a GEX snapshot
//!
//! Turns per-strike gamma exposure plus the published "major" levels into a
//! short, importance-ordered list of chart annotations.
//!
//! Four level classes, each with a fixed importance tier:
//! - **Zero gamma** (10): where net dealer gamma flips sign
//! - **Majors** (9 by volume, 8 by open interest): largest positive/negative concentrations
//! - **Top strikes** (7): strikes with the largest combined |GEX|
//! - **Hotspots** (6): largest recent change in gamma over short lookbacks
//!
//! Pipeline:
//! 1. **Extraction**: one rule per class, missing inputs contribute nothing
//! 2. **Conversion**: optional index → futures rescaling
//! 3. **Ranking**: sort by tier then price, drop price collisions
//! 4. **History** (optional): replicate levels across a trailing date window

mod config;
mod engine;
mod extraction;
mod history;
mod ranking;

pub use config::*;
pub use engine::*;
pub use extraction::*;
pub use history::*;
pub use ranking::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::{MalformedEntry, PriceScale};

/// Chart meaning of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    ZeroGamma,
    Support,
    Resistance,
    Hotspot,
}

impl LevelKind {
    /// Name used in the levels CSV `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelKind::ZeroGamma => "zero_gamma",
            LevelKind::Support => "support",
            LevelKind::Resistance => "resistance",
            LevelKind::Hotspot => "hotspot",
        }
    }

    /// Support for positive exposure, resistance otherwise
    pub fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        }
    }
}

impl std::fmt::Display for LevelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data class a level was derived from
///
/// The importance tier belongs to the class, so it can never drift from
/// how the level was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelSource {
    ZeroGamma,
    MajorVolume,
    MajorOpenInterest,
    TopStrike,
    Hotspot,
}

impl LevelSource {
    pub fn importance(&self) -> u8 {
        match self {
            LevelSource::ZeroGamma => 10,
            LevelSource::MajorVolume => 9,
            LevelSource::MajorOpenInterest => 8,
            LevelSource::TopStrike => 7,
            LevelSource::Hotspot => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LevelSource::ZeroGamma => "zero_gamma",
            LevelSource::MajorVolume => "major_vol",
            LevelSource::MajorOpenInterest => "major_oi",
            LevelSource::TopStrike => "top_strike",
            LevelSource::Hotspot => "hotspot",
        }
    }

    pub const ALL: [LevelSource; 5] = [
        LevelSource::ZeroGamma,
        LevelSource::MajorVolume,
        LevelSource::MajorOpenInterest,
        LevelSource::TopStrike,
        LevelSource::Hotspot,
    ];
}

/// A chart level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Price in the run's unit system (index or target instrument)
    pub price: f64,
    /// Volume-based GEX attached for display (0 when not applicable)
    pub volume_metric: f64,
    /// Open-interest GEX attached for display (0 when not applicable)
    pub open_interest_metric: f64,
    pub kind: LevelKind,
    pub source: LevelSource,
    pub label: String,
}

impl Level {
    pub fn new(
        source: LevelSource,
        kind: LevelKind,
        price: f64,
        volume_metric: f64,
        open_interest_metric: f64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            price,
            volume_metric,
            open_interest_metric,
            kind,
            source,
            label: label.into(),
        }
    }

    /// Importance tier, higher is more significant
    pub fn importance(&self) -> u8 {
        self.source.importance()
    }

    /// Tooltip: "600.00 | Zero Gamma | tier 10 | vol 0.00 | oi 0.00"
    pub fn tooltip(&self) -> String {
        format!(
            "{:.2} | {} | tier {} | vol {:.2} | oi {:.2}",
            self.price,
            self.label,
            self.importance(),
            self.volume_metric,
            self.open_interest_metric
        )
    }
}

/// Result of one extraction run
#[derive(Debug, Clone)]
pub struct LevelExtractionResult {
    /// Ranked, deduplicated levels
    pub levels: Vec<Level>,
    /// Unit system of every price in `levels`
    pub scale: PriceScale,
    /// Candidates produced per source before ranking
    pub candidates_per_source: HashMap<LevelSource, usize>,
    /// Candidates removed by price deduplication
    pub duplicates_removed: usize,
    /// Snapshot entries skipped as malformed
    pub skipped: Vec<MalformedEntry>,
}

impl LevelExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn of_kind(&self, kind: LevelKind) -> Vec<&Level> {
        self.levels.iter().filter(|l| l.kind == kind).collect()
    }

    pub fn zero_gamma(&self) -> Option<&Level> {
        self.levels.iter().find(|l| l.kind == LevelKind::ZeroGamma)
    }

    pub fn supports(&self) -> Vec<&Level> {
        self.of_kind(LevelKind::Support)
    }

    pub fn resistances(&self) -> Vec<&Level> {
        self.of_kind(LevelKind::Resistance)
    }

    pub fn hotspots(&self) -> Vec<&Level> {
        self.of_kind(LevelKind::Hotspot)
    }

    /// The `n` most important levels
    pub fn top(&self, n: usize) -> &[Level] {
        &self.levels[..n.min(self.levels.len())]
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates_per_source.values().sum()
    }
}
