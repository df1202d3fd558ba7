//! Stage 3 (optional): History Replication
//!
//! Some tabular feeds need a minimum number of dated rows per series. Each
//! level is repeated as a flat OHLC bar on every day of a trailing window.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Level;

/// Marker appended to the 8-digit date
pub const DATE_SUFFIX: char = 'T';

/// One degenerate daily bar for a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Importance tier of the level
    pub volume: f64,
}

impl HistoryRow {
    pub fn from_level(level: &Level, date: NaiveDate) -> Self {
        Self {
            date,
            open: level.price,
            high: level.price,
            low: level.price,
            close: level.price,
            volume: f64::from(level.importance()),
        }
    }

    /// "YYYYMMDDT"
    pub fn date_field(&self) -> String {
        format!("{}{}", self.date.format("%Y%m%d"), DATE_SUFFIX)
    }

    /// The six positional output fields, numbers fixed to 2 decimals
    pub fn to_record(&self) -> [String; 6] {
        [
            self.date_field(),
            format!("{:.2}", self.open),
            format!("{:.2}", self.high),
            format!("{:.2}", self.low),
            format!("{:.2}", self.close),
            format!("{:.2}", self.volume),
        ]
    }
}

/// Repeat every level on each of the `window_days + 1` days ending at `reference`
///
/// Rows are ordered oldest date first; within a date, levels keep input order.
/// Days before the earliest representable date are left out.
pub fn replicate_history(
    levels: &[Level],
    reference: NaiveDate,
    window_days: u32,
) -> Vec<HistoryRow> {
    let mut rows = Vec::with_capacity(levels.len() * (window_days as usize + 1));

    for days_back in (0..=u64::from(window_days)).rev() {
        let Some(date) = reference.checked_sub_days(Days::new(days_back)) else {
            continue;
        };
        rows.extend(levels.iter().map(|level| HistoryRow::from_level(level, date)));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{LevelKind, LevelSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_level_window_three() {
        let levels = vec![Level::new(
            LevelSource::ZeroGamma,
            LevelKind::ZeroGamma,
            600.0,
            0.0,
            0.0,
            "Zero Gamma",
        )];
        let rows = replicate_history(&levels, date(2025, 3, 10), 3);

        assert_eq!(rows.len(), 4);
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 3, 7), date(2025, 3, 8), date(2025, 3, 9), date(2025, 3, 10)]
        );
        for row in &rows {
            assert_eq!(row.open, 600.0);
            assert_eq!(row.high, 600.0);
            assert_eq!(row.low, 600.0);
            assert_eq!(row.close, 600.0);
            assert_eq!(row.volume, 10.0);
        }
    }

    #[test]
    fn test_level_order_within_date() {
        let levels = vec![
            Level::new(LevelSource::MajorVolume, LevelKind::Support, 610.0, 0.0, 0.0, "a"),
            Level::new(LevelSource::Hotspot, LevelKind::Hotspot, 590.0, 0.0, 0.0, "b"),
        ];
        let rows = replicate_history(&levels, date(2025, 1, 1), 1);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].date, date(2024, 12, 31));
        assert_eq!(rows[0].close, 610.0);
        assert_eq!(rows[1].close, 590.0);
        assert_eq!(rows[1].volume, 6.0);
        assert_eq!(rows[2].date, date(2025, 1, 1));
    }

    #[test]
    fn test_record_format() {
        let level = Level::new(LevelSource::TopStrike, LevelKind::Resistance, 533.4, 0.0, 0.0, "r");
        let row = HistoryRow::from_level(&level, date(2025, 7, 4));
        assert_eq!(
            row.to_record(),
            [
                "20250704T".to_string(),
                "533.40".to_string(),
                "533.40".to_string(),
                "533.40".to_string(),
                "533.40".to_string(),
                "7.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_window_past_earliest_date() {
        let level = Level::new(LevelSource::ZeroGamma, LevelKind::ZeroGamma, 1.0, 0.0, 0.0, "z");
        let rows = replicate_history(std::slice::from_ref(&level), NaiveDate::MIN, 2);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::MIN);
    }

    #[test]
    fn test_empty_levels() {
        assert!(replicate_history(&[], date(2025, 1, 1), 30).is_empty());
    }
}
