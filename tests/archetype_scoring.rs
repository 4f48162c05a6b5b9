use std::collections::HashMap;

use fm24_moneyball::archetypes::{ARCHETYPES, Archetype, score_all, score_archetype};
use fm24_moneyball::frame::{Column, Frame};

const FORMULA_COLUMNS: &[&str] = &[
    "xGP/90",
    "Pas %",
    "Gl Mst/90",
    "Clr/90",
    "Int/90",
    "Blk/90",
    "Shts Blckd/90",
    "AerialDominance",
    "K Tck/90",
    "Tck/90",
    "xA/90",
    "Pr passes/90",
    "Drb/90",
    "Intensity",
    "NP-xG/90",
    "Pres C/90",
    "Offsides/90",
];

/// Frame with every formula input zeroed and a neutral league multiplier.
fn scoring_frame(positions: &[&str]) -> Frame {
    let n = positions.len();
    let mut frame = Frame::new(n);
    frame
        .push_column(
            "Position",
            Column::Text(positions.iter().map(|p| p.to_string()).collect()),
        )
        .unwrap();
    for name in FORMULA_COLUMNS {
        frame
            .push_column(*name, Column::Number(vec![0.0; n]))
            .unwrap();
    }
    frame
        .push_column("League Multiplier", Column::Number(vec![1.0; n]))
        .unwrap();
    frame
}

fn set_column(frame: &mut Frame, name: &str, values: Vec<f64>) {
    // Frames are append-only; rebuild with the column replaced.
    let mut rebuilt = Frame::new(frame.row_count());
    for (existing, column) in frame.iter() {
        if existing == name {
            rebuilt
                .push_column(existing, Column::Number(values.clone()))
                .unwrap();
        } else {
            rebuilt.push_column(existing, column.clone()).unwrap();
        }
    }
    *frame = rebuilt;
}

fn archetype(name: &str) -> &'static Archetype {
    ARCHETYPES
        .iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("unknown archetype {name}"))
}

#[test]
fn position_patterns_fan_out() {
    let frame = scoring_frame(&[
        "GK",
        "D (C)",
        "D (RLC)",
        "D (R)",
        "DM",
        "AM (C)",
        "AM (RL)",
        "AM (R), ST (C)",
    ]);
    let scores = score_all(&frame).unwrap();
    let cohorts: HashMap<&str, Vec<usize>> = scores
        .iter()
        .map(|s| {
            (
                s.archetype.name,
                s.rows.iter().map(|r| r.row).collect::<Vec<_>>(),
            )
        })
        .collect();

    assert_eq!(cohorts["Sweeper Keeper"], [0]);
    // "D (RLC)" is both a central defender and a fullback; the same player
    // lands in both cohorts.
    assert_eq!(cohorts["Central Defender"], [1, 2]);
    assert_eq!(cohorts["Fullback"], [2, 3]);
    assert_eq!(cohorts["Defensive Midfielder"], [4]);
    assert_eq!(cohorts["Attacking Midfielder"], [5]);
    assert_eq!(cohorts["Winger"], [6, 7]);
    assert_eq!(cohorts["Striker"], [7]);
}

#[test]
fn striker_cohort_percentiles_and_ranks() {
    let mut frame = scoring_frame(&["ST (C)", "ST (C)", "ST (C)", "ST (C)"]);
    set_column(&mut frame, "NP-xG/90", vec![1.125, 1.125, 0.625, 0.25]);
    set_column(&mut frame, "Offsides/90", vec![1.0; 4]);

    let scores = score_archetype(&frame, archetype("Striker"))
        .unwrap()
        .expect("cohort is non-empty");

    let adjusted: Vec<f64> = scores.rows.iter().map(|r| r.adjusted).collect();
    for (actual, expected) in adjusted.iter().zip([0.9, 0.9, 0.5, 0.2]) {
        assert!((actual - expected).abs() < 1e-12);
    }
    let percentiles: Vec<f64> = scores.rows.iter().map(|r| r.percentile).collect();
    assert_eq!(percentiles, [1.0, 1.0, 0.5, 0.25]);
    let rankings: Vec<Option<u32>> = scores.rows.iter().map(|r| r.ranking).collect();
    assert_eq!(rankings, [Some(1), Some(1), Some(3), Some(4)]);
}

#[test]
fn adjusted_rating_scales_with_league_multiplier() {
    let mut frame = scoring_frame(&["ST (C)"]);
    set_column(&mut frame, "NP-xG/90", vec![1.0]);
    set_column(&mut frame, "Intensity", vec![0.5]);
    set_column(&mut frame, "League Multiplier", vec![0.5]);

    let scores = score_archetype(&frame, archetype("Striker"))
        .unwrap()
        .expect("cohort is non-empty");
    let row = &scores.rows[0];
    // 0.80 * 1.0 + 0.10 * (1 - 0) + 0.10 * 0.5
    assert!((row.rating - 0.95).abs() < 1e-12);
    assert!((row.adjusted - 0.475).abs() < 1e-12);
    assert_eq!(row.percentile, 1.0);
    assert_eq!(row.ranking, Some(1));
}

#[test]
fn average_and_complement_terms() {
    let mut frame = scoring_frame(&["D (C)"]);
    for name in [
        "Clr/90",
        "Int/90",
        "Blk/90",
        "Shts Blckd/90",
        "AerialDominance",
        "K Tck/90",
        "Tck/90",
    ] {
        set_column(&mut frame, name, vec![0.5]);
    }
    set_column(&mut frame, "Gl Mst/90", vec![0.2]);
    set_column(&mut frame, "Pas %", vec![1.0]);

    let scores = score_archetype(&frame, archetype("Central Defender"))
        .unwrap()
        .expect("cohort is non-empty");
    // 0.80 * 0.5 + 0.05 * (1 - 0.2) + 0.15 * 1.0
    assert!((scores.rows[0].rating - 0.59).abs() < 1e-12);
}

#[test]
fn empty_cohort_is_skipped() {
    let frame = scoring_frame(&["ST (C)", "AM (L)"]);
    assert!(
        score_archetype(&frame, archetype("Sweeper Keeper"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn missing_position_never_matches() {
    let frame = scoring_frame(&["", "ST (C)"]);
    let scores = score_archetype(&frame, archetype("Striker"))
        .unwrap()
        .expect("cohort is non-empty");
    assert_eq!(scores.rows.len(), 1);
    assert_eq!(scores.rows[0].row, 1);
}

#[test]
fn missing_formula_column_is_an_error() {
    let mut frame = Frame::new(1);
    frame
        .push_column("Position", Column::Text(vec!["ST (C)".to_string()]))
        .unwrap();
    let err = score_archetype(&frame, archetype("Striker")).unwrap_err();
    assert!(format!("{err:#}").contains("NP-xG/90"));
}

#[test]
fn missing_ratings_rank_last() {
    let mut frame = scoring_frame(&["ST (C)", "ST (C)"]);
    set_column(&mut frame, "NP-xG/90", vec![f64::NAN, 0.5]);
    set_column(&mut frame, "Offsides/90", vec![1.0, 1.0]);

    let scores = score_archetype(&frame, archetype("Striker"))
        .unwrap()
        .expect("cohort is non-empty");
    assert!(scores.rows[0].rating.is_nan());
    assert!(scores.rows[0].percentile.is_nan());
    assert_eq!(scores.rows[0].ranking, None);
    assert_eq!(scores.rows[1].percentile, 1.0);
    assert_eq!(scores.rows[1].ranking, Some(1));
}
