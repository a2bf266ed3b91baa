use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

use crate::core::domain::OrderRecord;
use crate::error::{DaycountError, DaycountResult};
use crate::time::parse_order_date;

pub const NAME_COLUMN: &str = "Name";
pub const ORDER_TYPE_COLUMN: &str = "Order Type";
pub const START_DATE_COLUMN: &str = "Start Date";
pub const END_DATE_COLUMN: &str = "End Date";
pub const STATUS_COLUMN: &str = "Status";

/// Columns every orders export must carry
pub const REQUIRED_COLUMNS: [&str; 5] = [
    NAME_COLUMN,
    ORDER_TYPE_COLUMN,
    START_DATE_COLUMN,
    END_DATE_COLUMN,
    STATUS_COLUMN,
];

/// Untyped rows of one export, header split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub source_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(source_name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            source_name: source_name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    fn required_index(&self, column: &str) -> DaycountResult<usize> {
        self.column_index(column)
            .ok_or_else(|| DaycountError::MissingColumn {
                column: column.to_string(),
                source_name: self.source_name.clone(),
            })
    }

    /// Fail with `MissingColumn` unless every required column is present.
    pub fn check_required_columns(&self) -> DaycountResult<()> {
        for column in REQUIRED_COLUMNS {
            self.required_index(column)?;
        }
        Ok(())
    }
}

/// Read a tab-separated orders export from disk.
pub fn parse_orders_tsv(path: &Path) -> DaycountResult<RawTable> {
    let file = std::fs::File::open(path)?;
    read_raw_table(file, &path.display().to_string())
}

/// Read a tab-separated orders export from a string (handy for tests).
pub fn parse_orders_str(text: &str, source_name: &str) -> DaycountResult<RawTable> {
    read_raw_table(text.as_bytes(), source_name)
}

/// Read raw rows; the first non-blank line is the header.
///
/// Rows may be shorter or longer than the header; short rows are padded
/// with empty cells when typed, extra cells are ignored.
pub fn read_raw_table<R: Read>(reader: R, source_name: &str) -> DaycountResult<RawTable> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .quoting(true)
        .from_reader(reader);

    let mut table: Option<RawTable> = None;
    for record in csv_reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        match table.as_mut() {
            None => {
                if cells.iter().all(String::is_empty) {
                    continue;
                }
                table = Some(RawTable::new(source_name, cells));
            }
            Some(t) => t.rows.push(cells),
        }
    }

    let table = table.ok_or_else(|| DaycountError::MissingColumn {
        column: NAME_COLUMN.to_string(),
        source_name: source_name.to_string(),
    })?;
    table.check_required_columns()?;
    Ok(table)
}

/// Turn raw rows into typed orders.
///
/// Columns beyond the required five are kept on each record in header order.
/// Row numbers in errors are 1-based and count data rows after the header.
pub fn table_to_orders(table: &RawTable) -> DaycountResult<Vec<OrderRecord>> {
    let name_idx = table.required_index(NAME_COLUMN)?;
    let type_idx = table.required_index(ORDER_TYPE_COLUMN)?;
    let start_idx = table.required_index(START_DATE_COLUMN)?;
    let end_idx = table.required_index(END_DATE_COLUMN)?;
    let status_idx = table.required_index(STATUS_COLUMN)?;
    let required = [name_idx, type_idx, start_idx, end_idx, status_idx];

    let mut orders = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
        let row_error = |e: DaycountError| DaycountError::MalformedRow {
            row: i + 1,
            source_name: table.source_name.clone(),
            message: e.to_string(),
        };

        let start_date = parse_order_date(cell(start_idx)).map_err(row_error)?;
        let end_date = parse_order_date(cell(end_idx)).map_err(row_error)?;

        let mut order = OrderRecord::new(
            cell(name_idx),
            cell(type_idx),
            start_date,
            end_date,
            cell(status_idx),
        );
        order.extra = table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !required.contains(idx))
            .map(|(idx, header)| (header.clone(), cell(idx).to_string()))
            .collect();
        orders.push(order);
    }

    Ok(orders)
}
