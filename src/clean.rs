use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::frame::{Column, Frame};
use crate::leagues;
use crate::table::RawTable;

/// Columns that stay text through cleaning and are never scaled.
pub const TEXT_COLUMNS: &[&str] = &[
    "UID",
    "Name",
    "Rec",
    "EU National",
    "Position",
    "Pros",
    "Preferred Foot",
    "Inf",
    "Transfer Value",
    "Nat",
    "Division",
    "Club",
    "Personality",
    "Signability",
    "Expires",
];

/// Columns exported as `"83%"` style text; parsed to floats on a 0-100 scale.
pub const PERCENTAGE_COLUMNS: &[&str] = &[
    "Sv %",
    "OP-Cr %",
    "Hdr %",
    "Conv %",
    "Pas %",
    "Cr C/A",
    "Tck R",
    "Pens Saved Ratio",
    "Pen/R",
    "Shot %",
];

/// Raw counting stats converted to per-90 rates (raw column kept).
pub const PER90_DERIVED: &[(&str, &str)] = &[
    ("Yel", "Yellow/90"),
    ("Red", "Red/90"),
    ("Fls", "FoulsMade/90"),
    ("FA", "FoulsAgainst/90"),
    ("Off", "Offsides/90"),
    ("Gl Mst", "Gl Mst/90"),
    ("Goals Outside Box", "Goals Outside Box/90"),
    ("FK Shots", "FKShots/90"),
];

/// Distance column carries a unit suffix, e.g. `"7.3mi"`.
pub const DISTANCE_COLUMN: &str = "Dist/90";

/// Players below this many minutes are dropped before any derivation.
pub const MIN_MINUTES: f64 = 900.0;

/// Best-effort numeric parse: missing, `-`, or anything unparseable is NaN.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_percentage(raw: &str) -> f64 {
    let s = raw.trim();
    if s == "-" {
        return f64::NAN;
    }
    parse_number(s.trim_end_matches('%'))
}

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9.]+").expect("distance pattern is valid"));

fn parse_distance(raw: &str) -> f64 {
    LEADING_NUMBER
        .find(raw)
        .map(|m| parse_number(m.as_str()))
        .unwrap_or(f64::NAN)
}

/// Turn the merged string table into a typed frame: filter by minutes,
/// coerce every non-text column to numbers, derive per-90 rates and
/// composite metrics, and attach the league multiplier.
///
/// The transformation order matters; callers get the table back with the
/// derived columns appended after the export's own columns.
pub fn clean_and_derive(
    table: &RawTable,
    power_overrides: &HashMap<String, f64>,
) -> Result<Frame> {
    let mins_idx = table
        .column_index("Mins")
        .ok_or_else(|| anyhow!("merged table has no 'Mins' column"))?;

    let kept: Vec<&Vec<String>> = table
        .rows
        .iter()
        .filter(|row| parse_number(&row[mins_idx]) >= MIN_MINUTES)
        .collect();

    let mut frame = Frame::new(kept.len());
    for (idx, name) in table.headers.iter().enumerate() {
        let column = if TEXT_COLUMNS.contains(&name.as_str()) {
            Column::Text(kept.iter().map(|row| row[idx].clone()).collect())
        } else {
            let parse: fn(&str) -> f64 = if PERCENTAGE_COLUMNS.contains(&name.as_str()) {
                parse_percentage
            } else if name == DISTANCE_COLUMN {
                parse_distance
            } else {
                parse_number
            };
            Column::Number(kept.iter().map(|row| parse(&row[idx])).collect())
        };
        frame.push_column(name.clone(), column)?;
    }

    derive_per90(&mut frame)?;
    derive_composites(&mut frame)?;
    attach_league_multiplier(&mut frame, power_overrides)?;

    Ok(frame)
}

fn derive_per90(frame: &mut Frame) -> Result<()> {
    let mins = frame.numbers("Mins")?.to_vec();
    for (raw_name, derived_name) in PER90_DERIVED {
        let Ok(raw) = frame.numbers(raw_name) else {
            continue;
        };
        let values: Vec<f64> = raw
            .iter()
            .zip(&mins)
            .map(|(value, mins)| {
                let rate = value / (mins / 90.0);
                if rate.is_finite() { rate } else { 0.0 }
            })
            .collect();
        frame.push_column(*derived_name, Column::Number(values))?;
    }
    Ok(())
}

fn derive_composites(frame: &mut Frame) -> Result<()> {
    let sprints = frame.numbers("Sprints/90").context("Intensity inputs")?;
    let dist = frame.numbers(DISTANCE_COLUMN).context("Intensity inputs")?;
    // A distance of exactly 0 would blow up the ratio; treat it as 1 so the
    // metric degrades to the raw sprint rate.
    let intensity: Vec<f64> = sprints
        .iter()
        .zip(dist)
        .map(|(sprints, dist)| sprints / if *dist == 0.0 { 1.0 } else { *dist })
        .collect();

    let won = frame.numbers("Poss Won/90").context("NetPoss inputs")?;
    let lost = frame.numbers("Poss Lost/90").context("NetPoss inputs")?;
    let net_poss: Vec<f64> = won.iter().zip(lost).map(|(w, l)| w - l).collect();

    let chances = frame.numbers("Ch C/90").context("ChanceCreation inputs")?;
    let xa = frame.numbers("xA/90").context("ChanceCreation inputs")?;
    let chance_creation: Vec<f64> = chances
        .iter()
        .zip(xa)
        .map(|(c, xa)| 0.20 * c + 0.80 * xa)
        .collect();

    let headers_won = frame.numbers("Hdrs W/90").context("AerialDominance inputs")?;
    let header_pct = frame.numbers("Hdr %").context("AerialDominance inputs")?;
    let aerial: Vec<f64> = headers_won
        .iter()
        .zip(header_pct)
        .map(|(won, pct)| (won * pct) / 100.0)
        .collect();

    frame.push_column("Intensity", Column::Number(intensity))?;
    frame.push_column("NetPoss", Column::Number(net_poss))?;
    frame.push_column("ChanceCreation", Column::Number(chance_creation))?;
    frame.push_column("AerialDominance", Column::Number(aerial))?;
    Ok(())
}

fn attach_league_multiplier(
    frame: &mut Frame,
    power_overrides: &HashMap<String, f64>,
) -> Result<()> {
    let multipliers: Vec<f64> = frame
        .texts("Division")
        .context("league multiplier")?
        .iter()
        .map(|division| leagues::multiplier_for(division, power_overrides))
        .collect();
    frame.push_column("League Multiplier", Column::Number(multipliers))
}
