use anyhow::{Context, Result};
use regex::Regex;

use crate::frame::Frame;

/// One weighted component of an archetype formula. All referenced columns
/// hold already-scaled values in [0,1].
#[derive(Debug, Clone, Copy)]
pub enum Term {
    /// The column value itself.
    Stat(&'static str),
    /// `1 - value`, for stats where less is better.
    Complement(&'static str),
    /// Unweighted mean of several columns.
    Average(&'static [&'static str]),
}

/// A positional role with an eligibility pattern and a rating formula.
/// Declarative data, evaluated by [`score_archetype`]; weights sum to 1.
#[derive(Debug)]
pub struct Archetype {
    pub name: &'static str,
    pub pattern: &'static str,
    pub label: &'static str,
    pub weights: &'static [(f64, Term)],
}

/// Defensive workload stats shared by the central-defender and defensive-
/// midfielder formulas.
const DEFENSIVE_CORE: &[&str] = &[
    "Clr/90",
    "Int/90",
    "Blk/90",
    "Shts Blckd/90",
    "AerialDominance",
    "K Tck/90",
    "Tck/90",
];

pub const ARCHETYPES: &[Archetype] = &[
    Archetype {
        name: "Sweeper Keeper",
        pattern: r"GK",
        label: "SK Rating",
        weights: &[
            (0.80, Term::Stat("xGP/90")),
            (0.15, Term::Stat("Pas %")),
            (0.05, Term::Complement("Gl Mst/90")),
        ],
    },
    Archetype {
        name: "Central Defender",
        pattern: r"^D\s*\(([RLC]*C[RLC]*)\)",
        label: "CD Rating",
        weights: &[
            (0.80, Term::Average(DEFENSIVE_CORE)),
            (0.05, Term::Complement("Gl Mst/90")),
            (0.15, Term::Stat("Pas %")),
        ],
    },
    Archetype {
        name: "Fullback",
        pattern: r"^(D)\s*\((R|L|RL|RLC)\)",
        label: "FB Rating",
        weights: &[
            (0.80, Term::Stat("xA/90")),
            (0.05, Term::Average(&["Pr passes/90", "Drb/90"])),
            (0.15, Term::Stat("Intensity")),
        ],
    },
    Archetype {
        name: "Defensive Midfielder",
        pattern: r"DM",
        label: "DM Rating",
        weights: &[
            (0.80, Term::Average(DEFENSIVE_CORE)),
            (0.15, Term::Stat("Pas %")),
            (0.05, Term::Stat("Pr passes/90")),
        ],
    },
    Archetype {
        name: "Attacking Midfielder",
        pattern: r"^AM\s*\((C|RC|LC|RLC)\)",
        label: "AM Rating",
        weights: &[
            (0.80, Term::Average(&["NP-xG/90", "xA/90"])),
            (0.15, Term::Stat("Pas %")),
            (0.05, Term::Stat("Drb/90")),
        ],
    },
    Archetype {
        name: "Winger",
        pattern: r"^AM\s*\((L|R|RL|RLC)\)",
        label: "W Rating",
        weights: &[
            (0.80, Term::Average(&["NP-xG/90", "xA/90"])),
            (0.10, Term::Stat("Drb/90")),
            (0.10, Term::Stat("Pres C/90")),
        ],
    },
    Archetype {
        name: "Striker",
        pattern: r"ST",
        label: "ST Rating",
        weights: &[
            (0.80, Term::Stat("NP-xG/90")),
            (0.10, Term::Complement("Offsides/90")),
            (0.10, Term::Stat("Intensity")),
        ],
    },
];

/// A cohort member with its computed ratings. `row` indexes the shared
/// scaled frame; the frame itself is never mutated.
#[derive(Debug, Clone)]
pub struct ScoredRow {
    pub row: usize,
    pub rating: f64,
    pub adjusted: f64,
    pub percentile: f64,
    pub ranking: Option<u32>,
}

#[derive(Debug)]
pub struct ArchetypeScores<'a> {
    pub archetype: &'a Archetype,
    pub rows: Vec<ScoredRow>,
}

/// Score every archetype against the scaled frame. Archetypes with an empty
/// cohort are omitted entirely.
pub fn score_all(frame: &Frame) -> Result<Vec<ArchetypeScores<'static>>> {
    let mut scores = Vec::new();
    for archetype in ARCHETYPES {
        if let Some(result) = score_archetype(frame, archetype)? {
            scores.push(result);
        }
    }
    Ok(scores)
}

/// Filter, rate, and rank one archetype's cohort. Returns `None` when no
/// position matches. A position descriptor can list several roles, so the
/// same player may appear in several archetypes; that fan-out is intended.
pub fn score_archetype<'a>(
    frame: &Frame,
    archetype: &'a Archetype,
) -> Result<Option<ArchetypeScores<'a>>> {
    let pattern = Regex::new(archetype.pattern)
        .with_context(|| format!("position pattern for {}", archetype.name))?;
    let positions = frame.texts("Position").context("archetype filter")?;

    let cohort: Vec<usize> = positions
        .iter()
        .enumerate()
        .filter(|(_, position)| pattern.is_match(position))
        .map(|(row, _)| row)
        .collect();
    if cohort.is_empty() {
        return Ok(None);
    }

    let terms = resolve_terms(frame, archetype)
        .with_context(|| format!("rating formula for {}", archetype.name))?;
    let multipliers = frame.numbers("League Multiplier")?;

    let mut adjusted = Vec::with_capacity(cohort.len());
    let mut ratings = Vec::with_capacity(cohort.len());
    for &row in &cohort {
        let rating = evaluate(&terms, row);
        ratings.push(rating);
        adjusted.push(rating * multipliers[row]);
    }

    let percentiles = percentiles(&adjusted);
    let rankings = rankings(&adjusted);

    let rows = cohort
        .into_iter()
        .enumerate()
        .map(|(i, row)| ScoredRow {
            row,
            rating: ratings[i],
            adjusted: adjusted[i],
            percentile: percentiles[i],
            ranking: rankings[i],
        })
        .collect();

    Ok(Some(ArchetypeScores { archetype, rows }))
}

enum ResolvedTerm<'f> {
    Stat(&'f [f64]),
    Complement(&'f [f64]),
    Average(Vec<&'f [f64]>),
}

fn resolve_terms<'f>(
    frame: &'f Frame,
    archetype: &Archetype,
) -> Result<Vec<(f64, ResolvedTerm<'f>)>> {
    archetype
        .weights
        .iter()
        .map(|(weight, term)| {
            let resolved = match term {
                Term::Stat(name) => ResolvedTerm::Stat(frame.numbers(name)?),
                Term::Complement(name) => ResolvedTerm::Complement(frame.numbers(name)?),
                Term::Average(names) => ResolvedTerm::Average(
                    names
                        .iter()
                        .map(|name| frame.numbers(name))
                        .collect::<Result<_>>()?,
                ),
            };
            Ok((*weight, resolved))
        })
        .collect()
}

fn evaluate(terms: &[(f64, ResolvedTerm<'_>)], row: usize) -> f64 {
    terms
        .iter()
        .map(|(weight, term)| {
            let value = match term {
                ResolvedTerm::Stat(values) => values[row],
                ResolvedTerm::Complement(values) => 1.0 - values[row],
                ResolvedTerm::Average(columns) => {
                    columns.iter().map(|values| values[row]).sum::<f64>()
                        / columns.len() as f64
                }
            };
            weight * value
        })
        .sum()
}

/// Inclusive fractional rank: the share of the cohort (counting the player
/// themselves) whose adjusted rating is at or below this one. The best
/// player is always at 1.0. Missing ratings get a missing percentile and do
/// not count toward the denominator.
fn percentiles(adjusted: &[f64]) -> Vec<f64> {
    let sorted = sorted_finite(adjusted);
    let n = sorted.len() as f64;
    adjusted
        .iter()
        .map(|value| {
            if !value.is_finite() {
                return f64::NAN;
            }
            let at_or_below = sorted.partition_point(|x| *x <= *value);
            at_or_below as f64 / n
        })
        .collect()
}

/// Ordinal rank by adjusted rating descending; ties share the best rank
/// among them (1, 1, 3, ...). Missing ratings are unranked.
fn rankings(adjusted: &[f64]) -> Vec<Option<u32>> {
    let sorted = sorted_finite(adjusted);
    let n = sorted.len();
    adjusted
        .iter()
        .map(|value| {
            if !value.is_finite() {
                return None;
            }
            let at_or_below = sorted.partition_point(|x| *x <= *value);
            Some((n - at_or_below) as u32 + 1)
        })
        .collect()
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_and_rank_conventions() {
        let adjusted = [0.9, 0.9, 0.5, 0.2];
        assert_eq!(percentiles(&adjusted), [1.0, 1.0, 0.5, 0.25]);
        assert_eq!(
            rankings(&adjusted),
            [Some(1), Some(1), Some(3), Some(4)]
        );
    }

    #[test]
    fn missing_ratings_are_unranked() {
        let adjusted = [0.8, f64::NAN, 0.4];
        let pct = percentiles(&adjusted);
        assert_eq!(pct[0], 1.0);
        assert!(pct[1].is_nan());
        assert_eq!(pct[2], 0.5);
        assert_eq!(rankings(&adjusted), [Some(1), None, Some(2)]);
    }

    #[test]
    fn weights_sum_to_one() {
        for archetype in ARCHETYPES {
            let total: f64 = archetype.weights.iter().map(|(w, _)| w).sum();
            assert!(
                (total - 1.0).abs() < 1e-9,
                "{} weights sum to {total}",
                archetype.name
            );
        }
    }

    #[test]
    fn patterns_compile() {
        for archetype in ARCHETYPES {
            assert!(Regex::new(archetype.pattern).is_ok(), "{}", archetype.name);
        }
    }
}
