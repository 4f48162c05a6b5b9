use std::cmp::Ordering;

use anyhow::{Context, Result, anyhow};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::archetypes::ArchetypeScores;
use crate::frame::{Column, Frame};

/// Identity columns leading every archetype sheet.
const DISPLAY_COLUMNS: &[&str] = &[
    "UID",
    "Name",
    "Age",
    "Personality",
    "Signability",
    "EU National",
    "Position",
    "Preferred Foot",
    "Transfer Value",
    "Nat",
    "Division",
    "Club",
];

/// Display columns of the cross-archetype summary, in sheet order.
const SUMMARY_COLUMNS: &[&str] = &[
    "UID",
    "Name",
    "Position",
    "Club",
    "Division",
    "Signability",
    "Transfer Value",
    "Age",
    "Nat",
    "Personality",
];

pub const SUMMARY_SHEET: &str = "Player Archetype Summary";
const ARCHETYPES_HEADER: &str = "Top Archetypes (>95%)";

/// Percentile a player must exceed to reach the summary sheet.
const TOP_PERCENTILE: f64 = 0.95;

/// Assemble the report workbook: one sheet per scored archetype plus the
/// summary sheet, returned as xlsx bytes.
pub fn build_workbook(frame: &Frame, scores: &[ArchetypeScores]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    // The exports carry accented names; pin a font that renders them.
    let body = Format::new()
        .set_font_name("Arial Unicode MS")
        .set_align(FormatAlign::VerticalCenter);
    let percent = Format::new().set_num_format("0.0%");

    for result in scores {
        write_archetype_sheet(&mut workbook, frame, result, &body, &percent)?;
    }
    write_summary_sheet(&mut workbook, frame, scores, &body)?;

    workbook.save_to_buffer().context("serialize workbook")
}

fn write_archetype_sheet(
    workbook: &mut Workbook,
    frame: &Frame,
    result: &ArchetypeScores,
    body: &Format,
    percent: &Format,
) -> Result<()> {
    let archetype = result.archetype;
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(archetype.name)
        .with_context(|| format!("sheet name {}", archetype.name))?;

    let adjusted_label = format!("Adjusted {}", archetype.label);
    let mut headers: Vec<&str> = DISPLAY_COLUMNS.to_vec();
    headers.extend([
        archetype.label,
        adjusted_label.as_str(),
        "Percentile",
        "Ranking",
        "League Multiplier",
        "Expires",
    ]);

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    // Best adjusted rating first; rows without a rating sink to the bottom.
    let mut order: Vec<usize> = (0..result.rows.len()).collect();
    order.sort_by(|&a, &b| desc_nan_last(result.rows[a].adjusted, result.rows[b].adjusted));

    // Display columns, then label and adjusted label, then Percentile.
    let percentile_col = (DISPLAY_COLUMNS.len() + 2) as u16;

    for (out_row, &idx) in order.iter().enumerate() {
        let scored = &result.rows[idx];
        let row_idx = out_row as u32 + 1;
        let mut col = 0u16;

        for name in DISPLAY_COLUMNS {
            write_frame_cell(sheet, frame, row_idx, col, name, scored.row)?;
            col += 1;
        }
        col = write_rating_cell(sheet, row_idx, col, scored.rating)?;
        col = write_rating_cell(sheet, row_idx, col, scored.adjusted)?;
        col = write_rating_cell(sheet, row_idx, col, scored.percentile)?;
        if let Some(ranking) = scored.ranking {
            sheet.write_number(row_idx, col, f64::from(ranking))?;
        }
        col += 1;
        write_frame_cell(sheet, frame, row_idx, col, "League Multiplier", scored.row)?;
        col += 1;
        write_frame_cell(sheet, frame, row_idx, col, "Expires", scored.row)?;
    }

    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        if col == percentile_col {
            sheet.set_column_width(col, 12)?;
            sheet.set_column_format(col, percent)?;
        } else {
            let width = if *header == "Name" { 30 } else { 20 };
            sheet.set_column_width(col, width)?;
            sheet.set_column_format(col, body)?;
        }
    }

    Ok(())
}

#[derive(Debug)]
struct Mention {
    row: usize,
    uid: String,
    name: String,
    percentile: f64,
    archetype: &'static str,
}

#[derive(Debug)]
struct SummaryRow {
    row: usize,
    name: String,
    mentions: String,
    count: usize,
}

fn write_summary_sheet(
    workbook: &mut Workbook,
    frame: &Frame,
    scores: &[ArchetypeScores],
    body: &Format,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;

    let mut headers: Vec<&str> = SUMMARY_COLUMNS.to_vec();
    headers.extend([ARCHETYPES_HEADER, "Archetype Count"]);
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (row_idx, summary) in collect_summary_rows(frame, scores)?.iter().enumerate() {
        let row_idx = row_idx as u32 + 1;
        let mut col = 0u16;
        for name in SUMMARY_COLUMNS {
            write_frame_cell(sheet, frame, row_idx, col, name, summary.row)?;
            col += 1;
        }
        sheet.write_string(row_idx, col, &summary.mentions)?;
        sheet.write_number(row_idx, col + 1, summary.count as f64)?;
    }

    for (col, header) in headers.iter().enumerate() {
        let width = if *header == "Name" || *header == ARCHETYPES_HEADER {
            30
        } else {
            20
        };
        sheet.set_column_width(col as u16, width)?;
        sheet.set_column_format(col as u16, body)?;
    }

    Ok(())
}

/// Players above the percentile cut in any archetype, one row per player
/// with their qualifying archetypes joined into a single cell.
fn collect_summary_rows(frame: &Frame, scores: &[ArchetypeScores]) -> Result<Vec<SummaryRow>> {
    let uids = frame.texts("UID").context("summary sheet")?;
    let names = frame.texts("Name").context("summary sheet")?;

    let mut mentions: Vec<Mention> = Vec::new();
    for result in scores {
        for scored in &result.rows {
            if scored.percentile > TOP_PERCENTILE {
                mentions.push(Mention {
                    row: scored.row,
                    uid: uids[scored.row].clone(),
                    name: names[scored.row].clone(),
                    percentile: scored.percentile,
                    archetype: result.archetype.name,
                });
            }
        }
    }

    mentions.sort_by(|a, b| {
        a.uid
            .cmp(&b.uid)
            .then_with(|| b.percentile.total_cmp(&a.percentile))
    });

    let mut rows: Vec<SummaryRow> = Vec::new();
    for mention in mentions {
        let text = format!(
            "{} ({:.1}%)",
            mention.archetype,
            mention.percentile * 100.0
        );
        match rows.last_mut() {
            Some(last) if uids[last.row] == mention.uid && last.name == mention.name => {
                last.mentions.push_str(", ");
                last.mentions.push_str(&text);
                last.count += 1;
            }
            _ => rows.push(SummaryRow {
                row: mention.row,
                name: mention.name,
                mentions: text,
                count: 1,
            }),
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    Ok(rows)
}

fn write_frame_cell(
    sheet: &mut Worksheet,
    frame: &Frame,
    row_idx: u32,
    col: u16,
    name: &str,
    row: usize,
) -> Result<()> {
    let column = frame
        .get(name)
        .ok_or_else(|| anyhow!("report column '{name}' is missing"))?;
    match column {
        Column::Text(values) => {
            sheet.write_string(row_idx, col, &values[row])?;
        }
        Column::Number(values) if values[row].is_finite() => {
            sheet.write_number(row_idx, col, values[row])?;
        }
        // Missing numbers stay blank.
        Column::Number(_) => {}
    }
    Ok(())
}

fn write_rating_cell(
    sheet: &mut Worksheet,
    row_idx: u32,
    col: u16,
    value: f64,
) -> Result<u16> {
    if value.is_finite() {
        sheet.write_number(row_idx, col, value)?;
    }
    Ok(col + 1)
}

fn desc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
