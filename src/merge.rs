use std::collections::HashSet;

use crate::table::RawTable;

/// Transfer status a source table implies for every player in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signability {
    Transfer,
    Loan,
    Unavailable,
}

impl Signability {
    pub fn label(self) -> &'static str {
        match self {
            Signability::Transfer => "Available for Transfer",
            Signability::Loan => "Available on Loan",
            Signability::Unavailable => "Not Transferrable",
        }
    }
}

/// Stamp every row of a source with its signability. Overwrites the column
/// if the export already carried one.
pub fn tag_signability(table: &mut RawTable, signability: Signability) {
    let label = signability.label();
    match table.column_index("Signability") {
        Some(idx) => {
            for row in &mut table.rows {
                row[idx] = label.to_string();
            }
        }
        None => {
            table.headers.push("Signability".to_string());
            for row in &mut table.rows {
                row.push(label.to_string());
            }
        }
    }
}

/// Concatenate sources in priority order and drop rows whose UID was already
/// kept from an earlier source. Column sets are unioned in first-seen order;
/// cells a source lacks are empty. Rows with an empty UID are all kept: a
/// missing key is not evidence of a duplicate.
pub fn merge_sources(sources: Vec<RawTable>) -> RawTable {
    let mut headers: Vec<String> = Vec::new();
    for source in &sources {
        for header in &source.headers {
            if !headers.contains(header) {
                headers.push(header.clone());
            }
        }
    }

    let uid_idx = headers.iter().position(|h| h == "UID");
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for source in sources {
        let mapping: Vec<Option<usize>> = headers
            .iter()
            .map(|h| source.column_index(h))
            .collect();
        for row in source.rows {
            let merged: Vec<String> = mapping
                .iter()
                .map(|idx| idx.map_or_else(String::new, |i| row[i].clone()))
                .collect();
            if let Some(uid_idx) = uid_idx {
                let uid = &merged[uid_idx];
                if !uid.is_empty() && !seen.insert(uid.clone()) {
                    continue;
                }
            }
            rows.push(merged);
        }
    }

    RawTable { headers, rows }
}
