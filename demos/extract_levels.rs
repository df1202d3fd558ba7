//! Example: Extract levels from a sample SPX snapshot
//!
//! Run with: cargo run --example extract_levels

use chrono::NaiveDate;
use gex_levels::prelude::*;
use serde_json::json;

fn main() {
    // Sample payload shaped like the classic GexBot response
    let payload = json!({
        "ticker": "SPX",
        "spot": 6012.4,
        "min_dte": 0,
        "zero_gamma": 5987.5,
        "major_pos_vol": 6050.0,
        "major_neg_vol": 5950.0,
        "major_pos_oi": 6100.0,
        "major_neg_oi": 5900.0,
        "sum_gex_vol": 1843.2,
        "sum_gex_oi": -922.7,
        "strikes": [
            [5950.0, -310.0, -120.0, []],
            [5975.0, -85.0, 40.0, []],
            [6000.0, 260.0, 410.0, []],
            [6025.0, 140.0, -30.0, []],
            [6050.0, 520.0, 180.0, []],
            [6075.0, 12.0, 9.0, []]
        ],
        "max_priors": [[6025.0, 64.0], [6000.0, 8.0], [5975.0, -31.0]]
    });

    let snapshot = GexSnapshot::from_value(&payload).expect("sample payload is an object");
    let mapping = TickerMapping::new("ES", 10.0, "S&P 500 E-mini");

    let engine = LevelEngine::new();
    let levels = match engine.run_ticker("SPX", Some(&mapping), &snapshot, false) {
        Ok(levels) => levels,
        Err(e) => {
            println!("Extraction failed: {}", e);
            return;
        }
    };

    println!("=== {} -> {} ===\n", levels.ticker, levels.target);
    println!("Scale: {}", levels.result.scale.label());
    println!("Candidates: {}", levels.result.candidate_count());
    println!("Duplicates removed: {}\n", levels.result.duplicates_removed);

    for level in levels.levels() {
        println!("{}", level.tooltip());
    }

    println!("\n--- Summary ---\n");
    println!("Supports: {}", levels.result.supports().len());
    println!("Resistances: {}", levels.result.resistances().len());
    println!("Hotspots: {}", levels.result.hotspots().len());

    println!("\n--- Levels CSV ---\n");
    let mut out = Vec::new();
    if write_levels(&mut out, levels.levels()).is_ok() {
        print!("{}", String::from_utf8_lossy(&out));
    }

    println!("\n--- History feed (first 3 rows) ---\n");
    let reference = NaiveDate::from_ymd_opt(2025, 3, 10);
    if let Some(Ok(rows)) = reference.map(|date| engine.history(levels.levels(), date)) {
        let mut out = Vec::new();
        if write_history(&mut out, &rows[..3.min(rows.len())]).is_ok() {
            print!("{}", String::from_utf8_lossy(&out));
        }
        println!("... {} rows total", rows.len());
    }
}
