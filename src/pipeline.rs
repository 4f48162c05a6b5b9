use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info};
use thiserror::Error;

use crate::archetypes;
use crate::clean::{self, MIN_MINUTES};
use crate::merge::{self, Signability};
use crate::normalize;
use crate::report;
use crate::scale;
use crate::table::{self, RawTable};

/// Pipeline configuration beyond the three inputs.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Division power ratings merged over the builtin table.
    pub league_power_overrides: HashMap<String, f64>,
}

/// The single failure category callers see. Whatever went wrong inside the
/// pipeline, the original message rides along.
#[derive(Debug, Error)]
#[error("processing failed: {message}")]
pub struct ProcessingError {
    message: String,
}

impl ProcessingError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Run the full pipeline over the three HTML exports and return the report
/// as xlsx bytes. Deterministic per input set; safe to re-invoke.
pub fn generate_report(
    signed_html: &str,
    loans_html: &str,
    universal_html: &str,
    options: &Options,
) -> Result<Vec<u8>, ProcessingError> {
    run(signed_html, loans_html, universal_html, options).map_err(|err| ProcessingError {
        message: format!("{err:#}"),
    })
}

fn run(
    signed_html: &str,
    loans_html: &str,
    universal_html: &str,
    options: &Options,
) -> Result<Vec<u8>> {
    let signed = prepare_source(signed_html, Signability::Transfer).context("signed players")?;
    let loans = prepare_source(loans_html, Signability::Loan).context("loan players")?;
    let universal =
        prepare_source(universal_html, Signability::Unavailable).context("universal players")?;

    let merged = merge::merge_sources(vec![signed, loans, universal]);
    info!("merged {} unique players from three sources", merged.rows.len());

    let mut frame = clean::clean_and_derive(&merged, &options.league_power_overrides)
        .context("clean and derive")?;
    info!(
        "{} players with at least {} minutes",
        frame.row_count(),
        MIN_MINUTES
    );

    scale::scale_frame(&mut frame);

    let scores = archetypes::score_all(&frame).context("score archetypes")?;
    for result in &scores {
        debug!(
            "{}: {} eligible players",
            result.archetype.name,
            result.rows.len()
        );
    }

    report::build_workbook(&frame, &scores).context("assemble report")
}

fn prepare_source(html: &str, signability: Signability) -> Result<RawTable> {
    let mut table = table::parse_html_table(html)?;
    normalize::fix_division_names(&mut table);
    normalize::normalize_uid(&mut table);
    merge::tag_signability(&mut table, signability);
    Ok(table)
}
