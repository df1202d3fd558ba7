//! Index → futures price conversion
//!
//! Index levels (SPX, NDX) are mapped onto the correlated futures contract
//! (ES, NQ) by dividing by a fixed per-ticker ratio and rounding to cents.

use serde::{Deserialize, Serialize};

use super::error::{GexError, GexResult};

/// Unit system applied to every level of one extraction run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PriceScale {
    /// Keep index-native prices untouched
    Raw,
    /// Divide by a validated, strictly positive ratio
    Ratio(f64),
}

impl PriceScale {
    /// Build a ratio scale, rejecting non-positive or non-finite ratios
    pub fn ratio(ratio: f64) -> GexResult<Self> {
        validate_ratio(ratio)?;
        Ok(PriceScale::Ratio(ratio))
    }

    /// Apply the scale to an index-denominated price
    pub fn apply(&self, price: f64) -> GexResult<f64> {
        match *self {
            PriceScale::Raw => Ok(price),
            PriceScale::Ratio(ratio) => convert(price, ratio),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, PriceScale::Raw)
    }

    pub fn label(&self) -> String {
        match self {
            PriceScale::Raw => "raw".to_string(),
            PriceScale::Ratio(r) => format!("1/{}", r),
        }
    }
}

impl Default for PriceScale {
    fn default() -> Self {
        PriceScale::Raw
    }
}

fn validate_ratio(ratio: f64) -> GexResult<()> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(GexError::configuration(format!(
            "conversion ratio must be strictly positive, got {}",
            ratio
        )));
    }
    Ok(())
}

/// Convert an index price into target-instrument units
///
/// `price / ratio`, rounded to 2 decimals with ties going to the even cent.
pub fn convert(price: f64, ratio: f64) -> GexResult<f64> {
    validate_ratio(ratio)?;
    Ok(round_cents(price / ratio))
}

/// Round to 2 decimal places, half-to-even
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
