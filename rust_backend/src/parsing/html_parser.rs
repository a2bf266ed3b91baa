use scraper::{ElementRef, Html, Selector};
use std::path::Path;

use crate::error::{DaycountError, DaycountResult};
use crate::parsing::tsv_parser::{RawTable, NAME_COLUMN};

/// Position of the orders table among all `<table>` elements of the saved page
pub const ORDERS_TABLE_INDEX: usize = 5;

/// Read the orders table out of a saved orders web page.
pub fn parse_orders_html(path: &Path) -> DaycountResult<RawTable> {
    let text = std::fs::read_to_string(path)?;
    parse_orders_html_str(&text, &path.display().to_string(), ORDERS_TABLE_INDEX)
}

/// Read the `table_index`-th table (document order, nested tables included)
/// of an HTML document into a raw table.
///
/// The page lays the table out with a blank first column and a blank first
/// row; the second row carries the column names. Both blanks are dropped and
/// the remaining rows become data rows.
///
/// # Errors
/// `MissingTable` when the page has too few tables, `MissingColumn` when the
/// table lacks a header row or a required column.
pub fn parse_orders_html_str(
    html: &str,
    source_name: &str,
    table_index: usize,
) -> DaycountResult<RawTable> {
    let document = Html::parse_document(html);
    let tables = selector("table")?;
    let table = document
        .select(&tables)
        .nth(table_index)
        .ok_or_else(|| DaycountError::MissingTable {
            index: table_index,
            source_name: source_name.to_string(),
        })?;

    let mut rows = table_rows(table)?.into_iter().map(|mut cells| {
        if !cells.is_empty() {
            cells.remove(0);
        }
        cells
    });
    rows.next();
    let headers = rows.next().ok_or_else(|| DaycountError::MissingColumn {
        column: NAME_COLUMN.to_string(),
        source_name: source_name.to_string(),
    })?;

    let mut raw = RawTable::new(source_name, headers);
    raw.rows = rows.collect();
    raw.check_required_columns()?;

    log::debug!(
        "Read {} row(s) from table #{} of {}",
        raw.rows.len(),
        table_index,
        source_name
    );
    Ok(raw)
}

fn selector(css: &str) -> DaycountResult<Selector> {
    Selector::parse(css)
        .map_err(|e| DaycountError::Config(format!("invalid selector '{}': {:?}", css, e)))
}

/// Rows that belong to `table` itself, skipping rows of nested tables.
fn table_rows(table: ElementRef<'_>) -> DaycountResult<Vec<Vec<String>>> {
    let rows = selector("tr")?;
    Ok(table
        .select(&rows)
        .filter(|row| owning_table(*row).map(|t| t.id()) == Some(table.id()))
        .map(row_cells)
        .collect())
}

fn owning_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

/// Cell texts with whitespace collapsed; a `colspan` repeats the value.
fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        let name = cell.value().name();
        if name != "td" && name != "th" {
            continue;
        }
        let text = cell
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        for _ in 0..span {
            cells.push(text.clone());
        }
    }
    cells
}
