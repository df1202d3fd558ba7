//! Stage 1: Candidate Extraction
//!
//! One independent rule per data class. Every rule tolerates missing input:
//! absent or zero fields simply produce no candidate.

use super::{Level, LevelConfig, LevelKind, LevelSource};
use crate::core::{GexSnapshot, PriorChange, StrikeGex};

/// Run all four extraction rules, in tier order, on index-unit prices
pub fn extract_candidates(snapshot: &GexSnapshot, config: &LevelConfig) -> Vec<Level> {
    let mut candidates = Vec::new();

    candidates.extend(zero_gamma_level(snapshot));
    candidates.extend(major_levels(snapshot));
    candidates.extend(top_strike_levels(&snapshot.strikes, config));
    candidates.extend(hotspot_levels(&snapshot.max_priors, config));

    candidates
}

/// Zero gamma (tier 10)
pub fn zero_gamma_level(snapshot: &GexSnapshot) -> Option<Level> {
    let price = snapshot.zero_gamma.filter(|&z| z != 0.0);

    match price {
        Some(price) => {
            tracing::debug!("Zero gamma at {}", price);
            Some(Level::new(
                LevelSource::ZeroGamma,
                LevelKind::ZeroGamma,
                price,
                0.0,
                0.0,
                "Zero Gamma",
            ))
        }
        None => {
            tracing::debug!("Zero gamma not reported");
            None
        }
    }
}

/// Major levels by volume (tier 9) and open interest (tier 8)
///
/// Volume majors carry `sum_gex_vol`, OI majors carry `sum_gex_oi`.
pub fn major_levels(snapshot: &GexSnapshot) -> Vec<Level> {
    let sum_vol = snapshot.sum_gex_volume.unwrap_or(0.0);
    let sum_oi = snapshot.sum_gex_open_interest.unwrap_or(0.0);
    let majors = &snapshot.majors;

    let table = [
        (
            majors.positive_volume,
            LevelSource::MajorVolume,
            LevelKind::Support,
            "Major Support (Vol)",
        ),
        (
            majors.negative_volume,
            LevelSource::MajorVolume,
            LevelKind::Resistance,
            "Major Resistance (Vol)",
        ),
        (
            majors.positive_open_interest,
            LevelSource::MajorOpenInterest,
            LevelKind::Support,
            "Major Support (OI)",
        ),
        (
            majors.negative_open_interest,
            LevelSource::MajorOpenInterest,
            LevelKind::Resistance,
            "Major Resistance (OI)",
        ),
    ];

    table
        .into_iter()
        .filter_map(|(price, source, kind, label)| {
            let price = price.filter(|&p| p != 0.0)?;
            let (vol, oi) = match source {
                LevelSource::MajorVolume => (sum_vol, 0.0),
                _ => (0.0, sum_oi),
            };
            Some(Level::new(source, kind, price, vol, oi, label))
        })
        .collect()
}

/// Support or resistance for a single strike
///
/// The larger-magnitude metric decides; an exact tie goes to open interest.
pub fn classify_strike(strike: &StrikeGex) -> LevelKind {
    if strike.gex_volume.abs() > strike.gex_open_interest.abs() {
        LevelKind::from_sign(strike.gex_volume)
    } else {
        LevelKind::from_sign(strike.gex_open_interest)
    }
}

/// Top strikes (tier 7)
///
/// Strikes above the noise threshold are ranked by combined |GEX| and
/// truncated to `top_strikes_count` before becoming levels. Equal scores
/// keep their input order.
pub fn top_strike_levels(strikes: &[StrikeGex], config: &LevelConfig) -> Vec<Level> {
    let mut ranked: Vec<(f64, &StrikeGex)> = strikes
        .iter()
        .map(|s| (s.importance_score(), s))
        .filter(|&(score, _)| score > 0.0 && score > config.noise_threshold)
        .collect();

    // Stable: equal scores keep input order
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(config.top_strikes_count);

    tracing::debug!(
        "{} of {} strikes retained as top strikes",
        ranked.len(),
        strikes.len()
    );

    ranked
        .into_iter()
        .map(|(_, strike)| {
            let kind = classify_strike(strike);
            let label = match kind {
                LevelKind::Support => "Support",
                _ => "Resistance",
            };
            Level::new(
                LevelSource::TopStrike,
                kind,
                strike.price,
                strike.gex_volume,
                strike.gex_open_interest,
                label,
            )
        })
        .collect()
}

/// Hotspots (tier 6) from the leading `max_priors` intervals
pub fn hotspot_levels(priors: &[PriorChange], config: &LevelConfig) -> Vec<Level> {
    priors
        .iter()
        .filter(|p| p.interval_index < config.hotspot_count)
        .filter(|p| p.price != 0.0 && p.change.abs() > config.hotspot_threshold)
        .map(|p| {
            Level::new(
                LevelSource::Hotspot,
                LevelKind::Hotspot,
                p.price,
                p.change,
                0.0,
                format!("Max Change {}", config.interval_name(p.interval_index)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MajorLevels;

    fn prior(idx: usize, price: f64, change: f64) -> PriorChange {
        PriorChange {
            interval_index: idx,
            price,
            change,
        }
    }

    #[test]
    fn test_zero_gamma_absent_or_zero() {
        let mut snap = GexSnapshot::default();
        assert!(zero_gamma_level(&snap).is_none());

        snap.zero_gamma = Some(0.0);
        assert!(zero_gamma_level(&snap).is_none());

        snap.zero_gamma = Some(5985.0);
        let level = zero_gamma_level(&snap).unwrap();
        assert_eq!(level.kind, LevelKind::ZeroGamma);
        assert_eq!(level.importance(), 10);
        assert_eq!(level.label, "Zero Gamma");
    }

    #[test]
    fn test_major_levels_tiers_and_metrics() {
        let snap = GexSnapshot {
            majors: MajorLevels {
                positive_volume: Some(6050.0),
                negative_volume: Some(5950.0),
                positive_open_interest: Some(0.0),
                negative_open_interest: Some(5900.0),
            },
            sum_gex_volume: Some(321.0),
            sum_gex_open_interest: Some(-654.0),
            ..Default::default()
        };

        let levels = major_levels(&snap);
        assert_eq!(levels.len(), 3);

        assert_eq!(levels[0].kind, LevelKind::Support);
        assert_eq!(levels[0].importance(), 9);
        assert_eq!(levels[0].volume_metric, 321.0);
        assert_eq!(levels[0].open_interest_metric, 0.0);

        assert_eq!(levels[1].kind, LevelKind::Resistance);
        assert_eq!(levels[1].label, "Major Resistance (Vol)");

        assert_eq!(levels[2].importance(), 8);
        assert_eq!(levels[2].label, "Major Resistance (OI)");
        assert_eq!(levels[2].volume_metric, 0.0);
        assert_eq!(levels[2].open_interest_metric, -654.0);
    }

    #[test]
    fn test_classify_strike() {
        assert_eq!(classify_strike(&StrikeGex::new(1.0, 80.0, -20.0)), LevelKind::Support);
        assert_eq!(classify_strike(&StrikeGex::new(1.0, -80.0, 20.0)), LevelKind::Resistance);
        assert_eq!(classify_strike(&StrikeGex::new(1.0, 10.0, 60.0)), LevelKind::Support);
        assert_eq!(classify_strike(&StrikeGex::new(1.0, 10.0, -60.0)), LevelKind::Resistance);
        // Exact tie: open interest sign decides
        assert_eq!(classify_strike(&StrikeGex::new(1.0, -50.0, 50.0)), LevelKind::Support);
        assert_eq!(classify_strike(&StrikeGex::new(1.0, 50.0, -50.0)), LevelKind::Resistance);
    }

    #[test]
    fn test_top_strikes_threshold_and_truncation() {
        let strikes = vec![
            StrikeGex::new(6000.0, 30.0, 10.0), // 40, below noise
            StrikeGex::new(6010.0, 100.0, 0.0), // 100
            StrikeGex::new(6020.0, -300.0, 50.0), // 350
            StrikeGex::new(6030.0, 0.0, 200.0), // 200
            StrikeGex::new(6040.0, 60.0, -10.0), // 70
        ];
        let config = LevelConfig {
            top_strikes_count: 3,
            ..Default::default()
        };

        let levels = top_strike_levels(&strikes, &config);
        let prices: Vec<f64> = levels.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![6020.0, 6030.0, 6010.0]);
        assert!(levels.iter().all(|l| l.importance() == 7));
        assert_eq!(levels[0].kind, LevelKind::Resistance);
        assert_eq!(levels[0].label, "Resistance");
        assert_eq!(levels[0].volume_metric, -300.0);
        assert_eq!(levels[0].open_interest_metric, 50.0);
    }

    #[test]
    fn test_zero_metric_strike_never_emitted() {
        let strikes = vec![StrikeGex::new(6000.0, 0.0, 0.0)];
        let config = LevelConfig {
            noise_threshold: 0.0,
            ..Default::default()
        };
        assert!(top_strike_levels(&strikes, &config).is_empty());
    }

    #[test]
    fn test_top_strikes_stable_on_equal_score() {
        let strikes = vec![
            StrikeGex::new(6100.0, 60.0, 0.0),
            StrikeGex::new(6000.0, -60.0, 0.0),
        ];
        let levels = top_strike_levels(&strikes, &LevelConfig::default());
        assert_eq!(levels[0].price, 6100.0);
        assert_eq!(levels[1].price, 6000.0);
    }

    #[test]
    fn test_hotspots() {
        let priors = vec![
            prior(0, 6000.0, 15.0),
            prior(1, 0.0, 500.0),    // no price
            prior(2, 6010.0, -40.0), // negative change counts by magnitude
            prior(3, 6020.0, 90.0),  // beyond hotspot_count
        ];
        let levels = hotspot_levels(&priors, &LevelConfig::default());
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].label, "Max Change 1min");
        assert_eq!(levels[0].volume_metric, 15.0);
        assert_eq!(levels[1].label, "Max Change 10min");
        assert!(levels.iter().all(|l| l.importance() == 6));
    }

    #[test]
    fn test_hotspot_generic_interval_label() {
        let config = LevelConfig {
            hotspot_count: 5,
            ..Default::default()
        };
        let levels = hotspot_levels(&[prior(4, 6000.0, 50.0)], &config);
        assert_eq!(levels[0].label, "Max Change 4-interval");
    }

    #[test]
    fn test_empty_snapshot_no_candidates() {
        let candidates = extract_candidates(&GexSnapshot::default(), &LevelConfig::default());
        assert!(candidates.is_empty());
    }
}
