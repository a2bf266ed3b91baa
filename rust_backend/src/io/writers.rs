use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use crate::algorithms::aggregation::Aggregate;
use crate::core::domain::OrderRecord;
use crate::error::{DaycountError, DaycountResult};
use crate::parsing::tsv_parser::{
    END_DATE_COLUMN, NAME_COLUMN, ORDER_TYPE_COLUMN, REQUIRED_COLUMNS, START_DATE_COLUMN,
    STATUS_COLUMN,
};
use crate::time::ORDER_DATE_FORMAT;

/// Header of the day-count column in every report
pub const TOTAL_DAYS_COLUMN: &str = "Total Days";

/// How the output file is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Create the file; fail if it exists (`x`)
    #[default]
    #[serde(alias = "x")]
    FailIfExists,
    /// Create or truncate (`w`)
    #[serde(alias = "w")]
    Overwrite,
    /// Append, creating the file if missing (`a`)
    #[serde(alias = "a")]
    Append,
}

impl FromStr for WriteMode {
    type Err = DaycountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "fail-if-exists" => Ok(WriteMode::FailIfExists),
            "w" | "overwrite" => Ok(WriteMode::Overwrite),
            "a" | "append" => Ok(WriteMode::Append),
            other => Err(DaycountError::UnknownWriteMode(other.to_string())),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            WriteMode::FailIfExists => "x",
            WriteMode::Overwrite => "w",
            WriteMode::Append => "a",
        };
        f.write_str(token)
    }
}

/// A report flattened to string cells, ready to write or print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Flatten an aggregate into a table.
    ///
    /// `source_columns` is the ingested header; it only shapes passthrough
    /// output and falls back to the required columns when empty.
    pub fn from_aggregate(aggregate: &Aggregate, source_columns: &[String]) -> Self {
        match aggregate {
            Aggregate::Totals { mode, rows } => {
                let mut headers: Vec<String> =
                    mode.key_columns().iter().map(|c| c.to_string()).collect();
                headers.push(TOTAL_DAYS_COLUMN.to_string());
                let rows = rows
                    .iter()
                    .map(|row| {
                        let mut cells: Vec<String> =
                            row.key.values().into_iter().map(str::to_string).collect();
                        cells.push(row.total_days.to_string());
                        cells
                    })
                    .collect();
                Self { headers, rows }
            }
            Aggregate::GrandTotal { total_days } => Self {
                headers: vec![TOTAL_DAYS_COLUMN.to_string()],
                rows: vec![vec![total_days.to_string()]],
            },
            Aggregate::Records { orders } => {
                let mut headers = record_columns(source_columns);
                let rows = orders
                    .iter()
                    .map(|order| {
                        let mut cells: Vec<String> =
                            headers.iter().map(|h| record_cell(&order.record, h)).collect();
                        cells.push(order.total_days.to_string());
                        cells
                    })
                    .collect();
                headers.push(TOTAL_DAYS_COLUMN.to_string());
                Self { headers, rows }
            }
        }
    }

    /// Lay ingested orders back out under their source columns, without any
    /// day count. This is the cleaned export a saved web page converts to.
    pub fn from_orders(orders: &[OrderRecord], source_columns: &[String]) -> Self {
        let headers = record_columns(source_columns);
        let rows = orders
            .iter()
            .map(|order| headers.iter().map(|h| record_cell(order, h)).collect())
            .collect();
        Self { headers, rows }
    }

    /// Render with columns padded to equal width, for the console
    pub fn to_aligned_string(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let render = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    format!("{:<width$}", cell, width = width)
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = render(&self.headers);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&render(row));
            out.push('\n');
        }
        out
    }
}

fn record_columns(source_columns: &[String]) -> Vec<String> {
    if source_columns.is_empty() {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        source_columns.to_vec()
    }
}

fn record_cell(record: &OrderRecord, column: &str) -> String {
    match column {
        NAME_COLUMN => record.name.clone(),
        ORDER_TYPE_COLUMN => record.order_type.clone(),
        START_DATE_COLUMN => record.start_date.format(ORDER_DATE_FORMAT).to_string(),
        END_DATE_COLUMN => record.end_date.format(ORDER_DATE_FORMAT).to_string(),
        STATUS_COLUMN => record.status.clone(),
        other => record
            .extra
            .iter()
            .find(|(header, _)| header == other)
            .map(|(_, value)| value.clone())
            .unwrap_or_default(),
    }
}

fn open_output(path: &Path, mode: WriteMode) -> DaycountResult<(File, bool)> {
    match mode {
        WriteMode::FailIfExists => {
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::AlreadyExists => {
                        DaycountError::OutputExists(path.to_path_buf())
                    }
                    _ => DaycountError::Io(e),
                })?;
            Ok((file, true))
        }
        WriteMode::Overwrite => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            Ok((file, true))
        }
        WriteMode::Append => {
            let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok((file, is_new))
        }
    }
}

/// Write a report as tab-separated values.
///
/// The header is written unless appending to a non-empty file.
///
/// # Errors
/// `OutputExists` when `mode` is [`WriteMode::FailIfExists`] and the file is there
pub fn write_report(path: &Path, table: &ReportTable, mode: WriteMode) -> DaycountResult<()> {
    let (file, write_header) = open_output(path, mode)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer.write_record(&table.headers)?;
    }
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} row(s) to {} (mode {})",
        table.rows.len(),
        path.display(),
        mode
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::aggregation::{aggregate, AggregationMode, UnmappedPolicy};
    use crate::core::domain::ClippedOrder;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clipped_orders() -> Vec<ClippedOrder> {
        let mut first =
            OrderRecord::new("DOE, JANE", "AT-SC", ymd(2024, 1, 1), ymd(2024, 1, 5), "APPROVED");
        first.extra = vec![("UIC".to_string(), "12345".to_string())];
        let second = OrderRecord::new(
            "ROE, RICH",
            "ADT-SCRE",
            ymd(2024, 1, 10),
            ymd(2024, 1, 12),
            "COMPLETE",
        );
        vec![ClippedOrder::new(first), ClippedOrder::new(second)]
    }

    fn source_columns() -> Vec<String> {
        ["Name", "UIC", "Order Type", "Start Date", "End Date", "Status"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_write_mode_tokens() {
        assert_eq!("x".parse::<WriteMode>().unwrap(), WriteMode::FailIfExists);
        assert_eq!("w".parse::<WriteMode>().unwrap(), WriteMode::Overwrite);
        assert_eq!("a".parse::<WriteMode>().unwrap(), WriteMode::Append);
        assert!("r".parse::<WriteMode>().is_err());
        assert_eq!(WriteMode::default().to_string(), "x");
    }

    #[test]
    fn test_table_for_per_person_by_type() {
        let result =
            aggregate(clipped_orders(), AggregationMode::PersonByType, UnmappedPolicy::Error)
                .unwrap();
        let table = ReportTable::from_aggregate(&result, &[]);
        assert_eq!(table.headers, vec!["Name", "Order Type", "Total Days"]);
        assert_eq!(table.rows[0], vec!["DOE, JANE", "AT-SC", "5"]);
        assert_eq!(table.rows[1], vec!["ROE, RICH", "ADT-SCRE", "3"]);
    }

    #[test]
    fn test_table_for_grand_total() {
        let result =
            aggregate(clipped_orders(), AggregationMode::GrandTotal, UnmappedPolicy::Error)
                .unwrap();
        let table = ReportTable::from_aggregate(&result, &[]);
        assert_eq!(table.headers, vec!["Total Days"]);
        assert_eq!(table.rows, vec![vec!["8".to_string()]]);
    }

    #[test]
    fn test_passthrough_table_uses_source_columns() {
        let result =
            aggregate(clipped_orders(), AggregationMode::Passthrough, UnmappedPolicy::Error)
                .unwrap();
        let table = ReportTable::from_aggregate(&result, &source_columns());
        assert_eq!(table.headers.last().unwrap(), "Total Days");
        assert_eq!(
            table.rows[0],
            vec!["DOE, JANE", "12345", "AT-SC", "2024/01/01", "2024/01/05", "APPROVED", "5"]
        );
        assert_eq!(table.rows[1][1], "");
    }

    #[test]
    fn test_orders_table_has_no_day_count() {
        let orders: Vec<OrderRecord> = clipped_orders().into_iter().map(|c| c.record).collect();
        let table = ReportTable::from_orders(&orders, &source_columns());
        assert_eq!(table.headers, source_columns());
        assert_eq!(
            table.rows[1],
            vec!["ROE, RICH", "", "ADT-SCRE", "2024/01/10", "2024/01/12", "COMPLETE"]
        );

        let fallback = ReportTable::from_orders(&orders, &[]);
        assert_eq!(fallback.headers, REQUIRED_COLUMNS.to_vec());
    }

    #[test]
    fn test_aligned_string() {
        let table = ReportTable {
            headers: vec!["Order Type".to_string(), "Total Days".to_string()],
            rows: vec![vec!["AT".to_string(), "8".to_string()]],
        };
        let text = table.to_aligned_string();
        assert_eq!(text, "Order Type  Total Days\nAT          8\n");
    }

    #[test]
    fn test_fail_if_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let table = ReportTable {
            headers: vec!["Total Days".to_string()],
            rows: vec![vec!["8".to_string()]],
        };

        write_report(&path, &table, WriteMode::FailIfExists).unwrap();
        let err = write_report(&path, &table, WriteMode::FailIfExists).unwrap_err();
        assert!(matches!(err, DaycountError::OutputExists(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Total Days\n8\n");
    }

    #[test]
    fn test_overwrite_and_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let table = ReportTable {
            headers: vec!["Order Type".to_string(), "Total Days".to_string()],
            rows: vec![vec!["AT".to_string(), "8".to_string()]],
        };

        write_report(&path, &table, WriteMode::Append).unwrap();
        write_report(&path, &table, WriteMode::Append).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Order Type\tTotal Days\nAT\t8\nAT\t8\n"
        );

        write_report(&path, &table, WriteMode::Overwrite).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Order Type\tTotal Days\nAT\t8\n"
        );
    }
}
