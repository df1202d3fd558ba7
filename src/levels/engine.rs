//! LevelEngine - Main facade for the level extraction pipeline
//!
//! Combines extraction, conversion and ranking into a single interface, and
//! applies the per-ticker error policy for multi-ticker runs.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{
    extract_candidates, rank_and_dedup, replicate_history, rescale_levels, HistoryRow, Level,
    LevelConfig, LevelExtractionResult, LevelSource, TickerMapping,
};
use crate::core::{GexError, GexResult, GexSnapshot, PriceScale};

/// Main level engine that runs the full pipeline
pub struct LevelEngine {
    config: LevelConfig,
}

impl LevelEngine {
    /// Create a new engine with default configuration
    pub fn new() -> Self {
        Self {
            config: LevelConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: LevelConfig) {
        self.config = config;
    }

    /// Run the full pipeline on one snapshot
    ///
    /// # Arguments
    /// * `snapshot` - Parsed GEX snapshot (index units)
    /// * `scale` - `PriceScale::Raw` to keep index prices, or a ratio
    ///
    /// # Returns
    /// Ranked levels; errors only on invalid configuration
    pub fn extract(
        &self,
        snapshot: &GexSnapshot,
        scale: PriceScale,
    ) -> GexResult<LevelExtractionResult> {
        self.config.validate()?;

        // Stage 1: Candidates in index units
        let candidates = extract_candidates(snapshot, &self.config);

        let mut candidates_per_source: HashMap<LevelSource, usize> = HashMap::new();
        for candidate in &candidates {
            *candidates_per_source.entry(candidate.source).or_insert(0) += 1;
        }
        for source in LevelSource::ALL {
            tracing::debug!(
                "{}: {} candidates",
                source.label(),
                candidates_per_source.get(&source).copied().unwrap_or(0)
            );
        }

        // Stage 2: Unit conversion
        let candidates = rescale_levels(candidates, scale)?;

        // Stage 3: Rank and deduplicate
        let (levels, duplicates_removed) = rank_and_dedup(candidates);

        Ok(LevelExtractionResult {
            levels,
            scale,
            candidates_per_source,
            duplicates_removed,
            skipped: snapshot.malformed.clone(),
        })
    }

    /// Extract levels for one configured ticker
    ///
    /// A missing mapping or invalid ratio is a `Configuration` error, an empty
    /// result is an `EmptyResult` error. Both only concern this ticker.
    pub fn run_ticker(
        &self,
        ticker: &str,
        mapping: Option<&TickerMapping>,
        snapshot: &GexSnapshot,
        raw: bool,
    ) -> GexResult<TickerLevels> {
        let mapping = mapping.ok_or_else(|| {
            GexError::configuration(format!("no ticker mapping configured for {}", ticker))
        })?;
        mapping.validate()?;

        let scale = if raw {
            PriceScale::Raw
        } else {
            PriceScale::ratio(mapping.ratio)?
        };

        let result = self.extract(snapshot, scale)?;

        if result.is_empty() {
            tracing::warn!("No levels for {} -> {}", ticker, mapping.target);
            return Err(GexError::empty_result(ticker));
        }

        tracing::info!(
            "{} -> {}: {} levels ({} candidates, {} duplicates, {} skipped entries)",
            ticker,
            mapping.target,
            result.len(),
            result.candidate_count(),
            result.duplicates_removed,
            result.skipped.len()
        );

        Ok(TickerLevels {
            ticker: ticker.to_string(),
            target: mapping.target.clone(),
            result,
        })
    }

    /// Replicate levels over the configured trailing window ending at `reference`
    ///
    /// Fails when the configured window is out of range.
    pub fn history(&self, levels: &[Level], reference: NaiveDate) -> GexResult<Vec<HistoryRow>> {
        self.config.validate()?;
        Ok(replicate_history(levels, reference, self.config.history_window_days))
    }
}

impl Default for LevelEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Levels extracted for one index ticker
#[derive(Debug, Clone)]
pub struct TickerLevels {
    /// Source index ticker, e.g. "SPX"
    pub ticker: String,
    /// Target futures symbol, e.g. "ES"
    pub target: String,
    pub result: LevelExtractionResult,
}

impl TickerLevels {
    pub fn levels(&self) -> &[Level] {
        &self.result.levels
    }
}

/// Outcome of one ticker within a run
#[derive(Debug)]
pub struct TickerOutcome {
    pub ticker: String,
    pub result: GexResult<TickerLevels>,
}

/// Outcomes of a multi-ticker run
///
/// The run succeeds when at least one ticker produced levels.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<TickerOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ticker: impl Into<String>, result: GexResult<TickerLevels>) {
        let ticker = ticker.into();
        if let Err(e) = &result {
            if e.is_soft() {
                tracing::warn!("{}: {}", ticker, e);
            } else {
                tracing::error!("{}: {}", ticker, e);
            }
        }
        self.outcomes.push(TickerOutcome { ticker, result });
    }

    pub fn successes(&self) -> Vec<&TickerLevels> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect()
    }

    /// (ticker, reason) for every failed ticker
    pub fn failures(&self) -> Vec<(&str, &GexError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.ticker.as_str(), e)))
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.successes().len()
    }

    pub fn is_success(&self) -> bool {
        self.success_count() > 0
    }

    /// "SPX: Configuration error: ...; NDX: No levels extracted for NDX"
    pub fn failure_summary(&self) -> String {
        self.failures()
            .iter()
            .map(|(ticker, e)| format!("{}: {}", ticker, e))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Convenience function to extract levels with the default configuration
pub fn extract_levels(
    snapshot: &GexSnapshot,
    scale: PriceScale,
) -> GexResult<LevelExtractionResult> {
    LevelEngine::new().extract(snapshot, scale)
}

/// Convenience function with custom config
pub fn extract_levels_with_config(
    snapshot: &GexSnapshot,
    scale: PriceScale,
    config: LevelConfig,
) -> GexResult<LevelExtractionResult> {
    LevelEngine::with_config(config).extract(snapshot, scale)
}
