use anyhow::{Result, bail};

/// A parsed tabular export: one header row plus string cells.
///
/// The game exports a view as a single-`<table>` HTML document. Everything
/// beyond pulling that table into rows and columns is someone else's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extract the first `<table>` element of an HTML document.
///
/// The first row becomes the header; rows shorter than the header are padded
/// with empty cells and longer rows are truncated. Markup nested inside a
/// cell is stripped, `<br>` becomes a space.
pub fn parse_html_table(html: &str) -> Result<RawTable> {
    let mut in_table = false;
    let mut all_rows: Vec<Vec<String>> = Vec::new();
    let mut cur_row: Option<Vec<String>> = None;
    let mut cur_cell: Option<String> = None;

    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        if let Some(cell) = cur_cell.as_mut() {
            cell.push_str(&rest[..lt]);
        }
        let Some(gt) = rest[lt..].find('>') else {
            break;
        };
        let tag = rest[lt + 1..lt + gt].trim();
        rest = &rest[lt + gt + 1..];

        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match (name.as_str(), closing) {
            ("table", false) => in_table = true,
            ("table", true) if in_table => {
                close_cell(&mut cur_cell, &mut cur_row);
                close_row(&mut cur_row, &mut all_rows);
                break;
            }
            ("tr", false) if in_table => {
                close_cell(&mut cur_cell, &mut cur_row);
                close_row(&mut cur_row, &mut all_rows);
                cur_row = Some(Vec::new());
            }
            ("tr", true) if in_table => {
                close_cell(&mut cur_cell, &mut cur_row);
                close_row(&mut cur_row, &mut all_rows);
            }
            ("th" | "td", false) if in_table => {
                close_cell(&mut cur_cell, &mut cur_row);
                if cur_row.is_none() {
                    cur_row = Some(Vec::new());
                }
                cur_cell = Some(String::new());
            }
            ("th" | "td", true) if in_table => close_cell(&mut cur_cell, &mut cur_row),
            ("br", _) => {
                if let Some(cell) = cur_cell.as_mut() {
                    cell.push(' ');
                }
            }
            // Markup inside a cell (bold, spans, ...) is dropped, the text kept.
            _ => {}
        }
    }

    if !in_table {
        bail!("no <table> element found in input");
    }

    let mut rows = all_rows.into_iter();
    let Some(headers) = rows.next() else {
        bail!("table has no header row");
    };

    let width = headers.len();
    let rows = rows
        .map(|mut row| {
            row.truncate(width);
            row.resize(width, String::new());
            row
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn close_cell(cell: &mut Option<String>, row: &mut Option<Vec<String>>) {
    if let Some(text) = cell.take() {
        let decoded = decode_entities(text.trim());
        if let Some(row) = row.as_mut() {
            row.push(decoded);
        }
    }
}

fn close_row(row: &mut Option<Vec<String>>, rows: &mut Vec<Vec<String>>) {
    if let Some(cells) = row.take() {
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
}

/// Decode the handful of entities the exports actually contain.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        let entity = &rest[1..semi];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            "nbsp" => out.push(' '),
            _ => match decode_numeric_entity(entity) {
                Some(ch) => out.push(ch),
                // Unknown entity: keep it verbatim.
                None => {
                    out.push_str(&rest[..=semi]);
                }
            },
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}
