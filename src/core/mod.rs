//! Core data types for GEX level extraction
//!
//! - GexSnapshot: normalised gamma exposure payload
//! - PriceScale: index → futures unit conversion
//! - GexError: error taxonomy

pub mod error;
pub mod snapshot;
pub mod units;

pub use error::*;
pub use snapshot::*;
pub use units::*;
