//! GEX snapshot as delivered by the classic GexBot endpoint
//!
//! The payload is loosely shaped: fields may be missing or `null`, some
//! fields exist under several spellings, and the `strikes` / `max_priors`
//! arrays are positional tuples. Everything is normalised here so the
//! level extractor only ever sees typed, finite values.

use serde_json::{Map, Value};

use super::error::{GexError, GexResult, InputSection};

/// Logical scalar fields of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GexField {
    ZeroGamma,
    MajorPositiveVolume,
    MajorNegativeVolume,
    MajorPositiveOpenInterest,
    MajorNegativeOpenInterest,
    SumGexVolume,
    SumGexOpenInterest,
    Spot,
    MinDte,
    Timestamp,
    Strikes,
    MaxPriors,
}

/// Accepted spellings per logical field, first present non-null value wins
pub const FIELD_ALIASES: &[(GexField, &[&str])] = &[
    (GexField::ZeroGamma, &["zero_gamma", "zeroGamma"]),
    (
        GexField::MajorPositiveVolume,
        &["major_pos_vol", "mpos_vol", "majorPositiveVolume"],
    ),
    (
        GexField::MajorNegativeVolume,
        &["major_neg_vol", "mneg_vol", "majorNegativeVolume"],
    ),
    (
        GexField::MajorPositiveOpenInterest,
        &["major_pos_oi", "mpos_oi", "majorPositiveOpenInterest"],
    ),
    (
        GexField::MajorNegativeOpenInterest,
        &["major_neg_oi", "mneg_oi", "majorNegativeOpenInterest"],
    ),
    (GexField::SumGexVolume, &["sum_gex_vol", "sumGexVolume"]),
    (GexField::SumGexOpenInterest, &["sum_gex_oi", "sumGexOpenInterest"]),
    (GexField::Spot, &["spot"]),
    (GexField::MinDte, &["min_dte", "minDte"]),
    (GexField::Timestamp, &["timestamp"]),
    (GexField::Strikes, &["strikes"]),
    (GexField::MaxPriors, &["max_priors", "maxPriors"]),
];

impl GexField {
    pub fn aliases(&self) -> &'static [&'static str] {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| field == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    /// Resolve this field in a JSON object
    pub fn lookup<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a Value> {
        self.aliases()
            .iter()
            .filter_map(|name| object.get(*name))
            .find(|v| !v.is_null())
    }
}

/// Per-strike gamma exposure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeGex {
    pub price: f64,
    pub gex_volume: f64,
    pub gex_open_interest: f64,
}

impl StrikeGex {
    pub fn new(price: f64, gex_volume: f64, gex_open_interest: f64) -> Self {
        Self {
            price,
            gex_volume,
            gex_open_interest,
        }
    }

    /// Combined absolute exposure used to rank strikes
    pub fn importance_score(&self) -> f64 {
        self.gex_volume.abs() + self.gex_open_interest.abs()
    }
}

/// Largest gamma change over one lookback interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorChange {
    /// Position in `max_priors` (0 = most recent interval)
    pub interval_index: usize,
    pub price: f64,
    pub change: f64,
}

/// An entry dropped while parsing `strikes` or `max_priors`
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedEntry {
    pub section: InputSection,
    pub index: usize,
    pub reason: String,
}

impl MalformedEntry {
    pub fn into_error(self) -> GexError {
        GexError::malformed_input(self.section, self.index, self.reason)
    }
}

impl std::fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} entry #{}: {}", self.section, self.index, self.reason)
    }
}

/// The four "major" levels published with each snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MajorLevels {
    pub positive_volume: Option<f64>,
    pub negative_volume: Option<f64>,
    pub positive_open_interest: Option<f64>,
    pub negative_open_interest: Option<f64>,
}

/// Normalised GEX snapshot for one ticker
#[derive(Debug, Clone, Default)]
pub struct GexSnapshot {
    pub ticker: Option<String>,
    pub timestamp: Option<i64>,
    pub spot: Option<f64>,
    pub min_dte: Option<f64>,
    pub zero_gamma: Option<f64>,
    pub majors: MajorLevels,
    pub sum_gex_volume: Option<f64>,
    pub sum_gex_open_interest: Option<f64>,
    pub strikes: Vec<StrikeGex>,
    /// Only the well-formed `max_priors` entries, each tagged with its original index
    pub max_priors: Vec<PriorChange>,
    /// Entries dropped while parsing (never fatal)
    pub malformed: Vec<MalformedEntry>,
}

impl GexSnapshot {
    /// Parse from a JSON value; only a non-object top level is an error
    pub fn from_value(value: &Value) -> GexResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            GexError::invalid_input(format!(
                "snapshot must be a JSON object, got {}",
                json_type(value)
            ))
        })?;

        let scalar = |field: GexField| field.lookup(object).and_then(finite_number);

        let mut snapshot = GexSnapshot {
            ticker: object
                .get("ticker")
                .and_then(Value::as_str)
                .map(str::to_string),
            timestamp: GexField::Timestamp.lookup(object).and_then(Value::as_i64),
            spot: scalar(GexField::Spot),
            min_dte: scalar(GexField::MinDte),
            zero_gamma: scalar(GexField::ZeroGamma),
            majors: MajorLevels {
                positive_volume: scalar(GexField::MajorPositiveVolume),
                negative_volume: scalar(GexField::MajorNegativeVolume),
                positive_open_interest: scalar(GexField::MajorPositiveOpenInterest),
                negative_open_interest: scalar(GexField::MajorNegativeOpenInterest),
            },
            sum_gex_volume: scalar(GexField::SumGexVolume),
            sum_gex_open_interest: scalar(GexField::SumGexOpenInterest),
            ..Default::default()
        };

        if let Some(rows) = GexField::Strikes.lookup(object).and_then(Value::as_array) {
            for (index, row) in rows.iter().enumerate() {
                match parse_numeric_row(row, 3, InputSection::Strikes, index) {
                    Ok(v) => snapshot.strikes.push(StrikeGex::new(v[0], v[1], v[2])),
                    Err(e) => snapshot.skip(e),
                }
            }
        }

        if let Some(rows) = GexField::MaxPriors.lookup(object).and_then(Value::as_array) {
            for (index, row) in rows.iter().enumerate() {
                match parse_numeric_row(row, 2, InputSection::MaxPriors, index) {
                    Ok(v) => snapshot.max_priors.push(PriorChange {
                        interval_index: index,
                        price: v[0],
                        change: v[1],
                    }),
                    Err(e) => snapshot.skip(e),
                }
            }
        }

        Ok(snapshot)
    }

    /// Parse from JSON text
    pub fn from_json_str(json: &str) -> GexResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| GexError::Serialization(e.to_string()))?;
        Self::from_value(&value)
    }

    fn skip(&mut self, entry: MalformedEntry) {
        tracing::warn!("Skipping malformed {}", entry);
        self.malformed.push(entry);
    }
}

impl TryFrom<Value> for GexSnapshot {
    type Error = GexError;

    fn try_from(value: Value) -> GexResult<Self> {
        Self::from_value(&value)
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Read the first `min_len` elements of a positional row as numbers
fn parse_numeric_row(
    row: &Value,
    min_len: usize,
    section: InputSection,
    index: usize,
) -> Result<Vec<f64>, MalformedEntry> {
    let malformed = |reason: String| MalformedEntry {
        section,
        index,
        reason,
    };

    let items = row
        .as_array()
        .ok_or_else(|| malformed(format!("expected array, got {}", json_type(row))))?;

    if items.len() < min_len {
        return Err(malformed(format!(
            "expected at least {} fields, got {}",
            min_len,
            items.len()
        )));
    }

    items[..min_len]
        .iter()
        .enumerate()
        .map(|(pos, item)| {
            finite_number(item).ok_or_else(|| {
                malformed(format!("field {} is not a number ({})", pos, json_type(item)))
            })
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_payload() {
        let payload = json!({
            "ticker": "SPX",
            "timestamp": 1760700000,
            "spot": 6012.5,
            "min_dte": 0,
            "zero_gamma": 5990.0,
            "major_pos_vol": 6050.0,
            "major_neg_vol": 5950.0,
            "major_pos_oi": 6100.0,
            "major_neg_oi": 5900.0,
            "sum_gex_vol": 1234.5,
            "sum_gex_oi": -876.0,
            "strikes": [[6000.0, 120.0, -40.0, [1.0, 2.0]], [6025.0, -10.0, 70.0, []]],
            "max_priors": [[6000.0, 55.0], [6025.0, -12.0], [0, 0]],
            "unknown_field": {"ignored": true}
        });

        let snap = GexSnapshot::from_value(&payload).unwrap();
        assert_eq!(snap.ticker.as_deref(), Some("SPX"));
        assert_eq!(snap.zero_gamma, Some(5990.0));
        assert_eq!(snap.majors.positive_volume, Some(6050.0));
        assert_eq!(snap.majors.negative_open_interest, Some(5900.0));
        assert_eq!(snap.sum_gex_open_interest, Some(-876.0));
        assert_eq!(snap.strikes.len(), 2);
        assert_eq!(snap.strikes[0], StrikeGex::new(6000.0, 120.0, -40.0));
        assert_eq!(snap.max_priors.len(), 3);
        assert_eq!(snap.max_priors[1].interval_index, 1);
        assert!(snap.malformed.is_empty());
    }

    #[test]
    fn test_synonyms_first_present_wins() {
        let payload = json!({
            "major_pos_vol": null,
            "mpos_vol": 4510.0,
            "majorPositiveVolume": 9999.0,
            "mneg_oi": 4400.0
        });
        let snap = GexSnapshot::from_value(&payload).unwrap();
        assert_eq!(snap.majors.positive_volume, Some(4510.0));
        assert_eq!(snap.majors.negative_open_interest, Some(4400.0));
        assert_eq!(snap.majors.negative_volume, None);
    }

    #[test]
    fn test_empty_object_is_valid() {
        let snap = GexSnapshot::from_value(&json!({})).unwrap();
        assert!(snap.zero_gamma.is_none());
        assert!(snap.strikes.is_empty());
        assert!(snap.max_priors.is_empty());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = GexSnapshot::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, GexError::InvalidInput(_)));
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let payload = json!({
            "strikes": [[6000.0, 1.0], [6010.0, 60.0, 5.0], "bad", [6020.0, "x", 1.0]],
            "max_priors": [[6000.0], [6005.0, 20.0]]
        });
        let snap = GexSnapshot::from_value(&payload).unwrap();
        assert_eq!(snap.strikes.len(), 1);
        assert_eq!(snap.strikes[0].price, 6010.0);
        assert_eq!(snap.max_priors.len(), 1);
        // The surviving prior keeps its original interval slot
        assert_eq!(snap.max_priors[0].interval_index, 1);
        assert_eq!(snap.malformed.len(), 4);
        assert_eq!(snap.malformed[0].section, InputSection::Strikes);
        assert_eq!(snap.malformed[3].section, InputSection::MaxPriors);
        assert!(snap.malformed.iter().all(|e| e.clone().into_error().is_soft()));
    }

    #[test]
    fn test_from_json_str() {
        let snap = GexSnapshot::from_json_str(r#"{"zero_gamma": 6000}"#).unwrap();
        assert_eq!(snap.zero_gamma, Some(6000.0));
        assert!(GexSnapshot::from_json_str("not json").is_err());
    }
}
