//! Stage 2: Conversion, Ranking and Deduplication

use std::cmp::Ordering;
use std::collections::HashSet;

use super::Level;
use crate::core::{GexResult, PriceScale};

/// Re-express candidates in the target unit system
///
/// Levels whose converted price is not finite are dropped.
pub fn rescale_levels(candidates: Vec<Level>, scale: PriceScale) -> GexResult<Vec<Level>> {
    if scale.is_raw() {
        return Ok(candidates);
    }

    let mut scaled = Vec::with_capacity(candidates.len());
    for level in candidates {
        let price = scale.apply(level.price)?;
        if !price.is_finite() {
            tracing::warn!("Dropping {} with non-finite price", level.label);
            continue;
        }
        scaled.push(Level { price, ..level });
    }
    Ok(scaled)
}

/// Importance descending, then price ascending
pub fn compare_levels(a: &Level, b: &Level) -> Ordering {
    b.importance()
        .cmp(&a.importance())
        .then_with(|| a.price.total_cmp(&b.price))
}

/// Sort and drop price collisions
///
/// The sort is stable, so candidates with identical tier and price keep
/// extraction order, and the first one at each price survives.
///
/// # Returns
/// (ranked levels, number of duplicates removed)
pub fn rank_and_dedup(mut candidates: Vec<Level>) -> (Vec<Level>, usize) {
    candidates.sort_by(compare_levels);

    let total = candidates.len();
    let mut seen: HashSet<u64> = HashSet::with_capacity(total);
    let ranked: Vec<Level> = candidates
        .into_iter()
        .filter(|level| seen.insert(price_key(level.price)))
        .collect();

    let removed = total - ranked.len();
    if removed > 0 {
        tracing::debug!("Removed {} levels with duplicate prices", removed);
    }

    (ranked, removed)
}

// -0.0 and 0.0 must collide
fn price_key(price: f64) -> u64 {
    (price + 0.0).to_bits()
}
