//! # GEX Levels - Gamma Exposure Chart Levels
//!
//! Derives a small, ranked set of price levels from an options gamma
//! exposure (GEX) snapshot of an index (SPX, NDX), optionally rescaled onto
//! the correlated futures contract (ES, NQ).
//!
//! ## Overview
//!
//! Each snapshot yields up to four classes of level:
//! - **Zero gamma**: where net dealer gamma changes sign
//! - **Majors**: largest positive/negative concentrations by volume and OI
//! - **Top strikes**: strikes with the largest combined |GEX|
//! - **Hotspots**: largest recent gamma change per lookback interval
//!
//! Levels are ranked by class importance, then price, and deduplicated on
//! price so every chart line is unique.
//!
//! ## Usage
//!
//! ```rust
//! use gex_levels::prelude::*;
//!
//! let snapshot = GexSnapshot::from_json_str(r#"{"zero_gamma": 6000.0}"#).unwrap();
//! let result = extract_levels(&snapshot, PriceScale::ratio(10.0).unwrap()).unwrap();
//!
//! assert_eq!(result.levels[0].price, 600.0);
//! assert_eq!(result.levels[0].importance(), 10);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Stream or persist levels across runs
//! - Correlate tickers with each other
//! - Model anything beyond the documented ranking heuristics

pub mod core;
pub mod data;
pub mod levels;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        convert, GexError, GexField, GexResult, GexSnapshot, InputSection, MajorLevels,
        MalformedEntry, PriceScale, PriorChange, StrikeGex,
    };

    // Data
    pub use crate::data::{
        api_key_from_env, save_history, save_levels, save_timestamp, write_history, write_levels,
        ApiSettings, GexBotClient, OutputSettings, Settings,
    };

    // Level extraction
    pub use crate::levels::{
        extract_levels,
        extract_levels_with_config,
        replicate_history,
        HistoryRow,
        // Core types
        Level,
        // Config
        LevelConfig,
        // Engine
        LevelEngine,
        LevelExtractionResult,
        LevelKind,
        LevelSource,
        RunReport,
        TickerLevels,
        TickerMapping,
    };
}

// Re-export main types at crate root
pub use crate::core::{GexError, GexResult, GexSnapshot, PriceScale};
pub use crate::levels::{Level, LevelConfig, LevelEngine};
