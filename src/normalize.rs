use crate::leagues::DIVISION_NAME_FIXES;
use crate::table::RawTable;

/// Canonicalize the UID column so the same player gets an identical key in
/// every source, however the export happened to format it: `"7458500"`,
/// `" 7458500"` and `"7458500.0"` all become `"7458500"`. Unparseable
/// values become empty (missing).
pub fn normalize_uid(table: &mut RawTable) {
    let Some(idx) = table.column_index("UID") else {
        return;
    };
    for row in &mut table.rows {
        row[idx] = canonical_uid(&row[idx]);
    }
}

fn canonical_uid(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => (value as i64).to_string(),
        _ => String::new(),
    }
}

/// Repair known-corrupt division names in place; anything not in the fix
/// table passes through untouched.
pub fn fix_division_names(table: &mut RawTable) {
    let Some(idx) = table.column_index("Division") else {
        return;
    };
    for row in &mut table.rows {
        if let Some(fixed) = DIVISION_NAME_FIXES.get(row[idx].as_str()) {
            row[idx] = (*fixed).to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(header: &str, cells: &[&str]) -> RawTable {
        RawTable {
            headers: vec![header.to_string()],
            rows: cells.iter().map(|c| vec![c.to_string()]).collect(),
        }
    }

    #[test]
    fn uid_formats_converge() {
        let mut table = table_with("UID", &["7458500", " 7458500", "7458500.0", "n/a", ""]);
        normalize_uid(&mut table);
        let uids: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(uids, ["7458500", "7458500", "7458500", "", ""]);
    }

    #[test]
    fn corrupt_division_names_are_fixed() {
        let mut table = table_with(
            "Division",
            &["BrasileirÃ£o AssaÃ­ SÃ©rie A", "Premier League", "Serie D Girone B"],
        );
        fix_division_names(&mut table);
        let names: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(
            names,
            ["Brasileirão Assaí Série A", "Premier League", "Serie D"]
        );
    }

    #[test]
    fn missing_columns_are_tolerated() {
        let mut table = table_with("Name", &["Someone"]);
        normalize_uid(&mut table);
        fix_division_names(&mut table);
        assert_eq!(table.rows[0][0], "Someone");
    }
}
