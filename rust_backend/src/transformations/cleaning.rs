use std::collections::HashSet;

use crate::error::{DaycountError, DaycountResult};
use crate::parsing::tsv_parser::{RawTable, NAME_COLUMN};

/// Whether every cell of the row is empty
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Whether the row is a repeat of the header block.
///
/// Saved pages often carry the header again at each page break, and
/// concatenated exports carry one per file.
pub fn is_header_row(row: &[String], headers: &[String]) -> bool {
    if row == headers {
        return true;
    }
    headers
        .iter()
        .position(|h| h == NAME_COLUMN)
        .and_then(|idx| row.get(idx))
        .map(|cell| cell == NAME_COLUMN)
        .unwrap_or(false)
}

/// Drop blank rows and repeated header rows.
///
/// # Returns
/// The cleaned table and the number of rows removed
pub fn strip_non_data_rows(table: &RawTable) -> (RawTable, usize) {
    let mut cleaned = RawTable::new(table.source_name.clone(), table.headers.clone());
    cleaned.rows = table
        .rows
        .iter()
        .filter(|row| !is_blank_row(row) && !is_header_row(row, &table.headers))
        .cloned()
        .collect();
    let removed = table.rows.len() - cleaned.rows.len();
    (cleaned, removed)
}

/// Merge several exports into one table.
///
/// Headers are unioned by name in first-seen order; a row from a file that
/// lacks some column gets an empty cell there. Each table must already carry
/// the required columns.
pub fn reconcile_tables(tables: Vec<RawTable>) -> DaycountResult<RawTable> {
    let mut iter = tables.into_iter();
    let mut merged = match iter.next() {
        Some(first) => first,
        None => {
            return Err(DaycountError::Config(
                "no input tables to reconcile".to_string(),
            ))
        }
    };
    merged.check_required_columns()?;

    for table in iter {
        table.check_required_columns()?;

        for header in &table.headers {
            if merged.column_index(header).is_none() {
                let width = merged.headers.len();
                merged.headers.push(header.clone());
                for row in merged.rows.iter_mut() {
                    row.resize(width, String::new());
                    row.push(String::new());
                }
            }
        }

        let positions: Vec<Option<usize>> = merged
            .headers
            .iter()
            .map(|h| table.column_index(h))
            .collect();
        for row in table.rows {
            let remapped = positions
                .iter()
                .map(|pos| pos.and_then(|p| row.get(p).cloned()).unwrap_or_default())
                .collect();
            merged.rows.push(remapped);
        }

        if merged.source_name != table.source_name {
            merged.source_name = format!("{}, {}", merged.source_name, table.source_name);
        }
    }

    Ok(merged)
}

/// Remove rows identical in every column, keeping the first occurrence.
///
/// # Returns
/// The deduplicated table and the number of rows removed
pub fn remove_duplicate_rows(table: &RawTable) -> (RawTable, usize) {
    let width = table.headers.len();
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(table.rows.len());
    let mut cleaned = RawTable::new(table.source_name.clone(), table.headers.clone());

    for row in &table.rows {
        let mut normalized = row.clone();
        normalized.resize(width, String::new());
        if seen.insert(normalized) {
            cleaned.rows.push(row.clone());
        }
    }

    let removed = table.rows.len() - cleaned.rows.len();
    (cleaned, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["Name", "Order Type", "Start Date", "End Date", "Status"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn table(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> RawTable {
        let mut t = RawTable::new(name, headers);
        t.rows = rows;
        t
    }

    #[test]
    fn test_strip_non_data_rows() {
        let t = table(
            "a.tsv",
            headers(),
            vec![
                row(&["A", "AT-AT", "2024/01/01", "2024/01/02", "APPROVED"]),
                row(&["", "", "", "", ""]),
                headers(),
                row(&["Name", "Type", "Start", "End", "Status"]),
                row(&["B", "AT-SC", "2024/01/01", "2024/01/02", "APPROVED"]),
            ],
        );
        let (cleaned, removed) = strip_non_data_rows(&t);
        assert_eq!(removed, 3);
        assert_eq!(cleaned.rows.len(), 2);
        assert_eq!(cleaned.rows[1][0], "B");
    }

    #[test]
    fn test_reconcile_reorders_and_unions_columns() {
        let a = table(
            "a.tsv",
            headers(),
            vec![row(&["A", "AT-AT", "2024/01/01", "2024/01/02", "APPROVED"])],
        );
        let b = table(
            "b.tsv",
            row(&["Status", "Name", "Order Type", "Start Date", "End Date", "UIC"]),
            vec![row(&["APPROVED", "B", "AT-SC", "2024/02/01", "2024/02/02", "12345"])],
        );

        let merged = reconcile_tables(vec![a, b]).unwrap();
        assert_eq!(merged.headers.last().unwrap(), "UIC");
        assert_eq!(merged.rows.len(), 2);
        assert_eq!(
            merged.rows[0],
            row(&["A", "AT-AT", "2024/01/01", "2024/01/02", "APPROVED", ""])
        );
        assert_eq!(
            merged.rows[1],
            row(&["B", "AT-SC", "2024/02/01", "2024/02/02", "APPROVED", "12345"])
        );
        assert_eq!(merged.source_name, "a.tsv, b.tsv");
    }

    #[test]
    fn test_reconcile_rejects_table_missing_required_column() {
        let a = table("a.tsv", headers(), vec![]);
        let b = table("b.tsv", row(&["Name", "Status"]), vec![]);
        assert!(matches!(
            reconcile_tables(vec![a, b]),
            Err(DaycountError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_reconcile_empty_list_fails() {
        assert!(reconcile_tables(Vec::new()).is_err());
    }

    #[test]
    fn test_remove_duplicate_rows_keeps_first() {
        let order = row(&["A", "AT-AT", "2024/01/01", "2024/01/02", "APPROVED"]);
        let t = table(
            "a.tsv",
            headers(),
            vec![
                order.clone(),
                row(&["A", "AT-AT", "2024/01/01", "2024/01/02", "CANCEL"]),
                order,
            ],
        );
        let (cleaned, removed) = remove_duplicate_rows(&t);
        assert_eq!(removed, 1);
        assert_eq!(cleaned.rows.len(), 2);
    }
}
