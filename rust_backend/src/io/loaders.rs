use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::domain::OrderRecord;
use crate::error::DaycountResult;
use crate::parsing::html_parser;
use crate::parsing::tsv_parser::{self, RawTable};
use crate::transformations::{
    reconcile_tables, remove_cancelled, remove_duplicate_rows, strip_non_data_rows,
};

/// Options controlling how exports are cleaned on the way in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Keep orders whose status is `CANCEL`
    pub include_cancelled: bool,
    /// Drop rows repeated verbatim across or within exports (off by default;
    /// two identical orders otherwise both count)
    pub remove_duplicates: bool,
}

/// One input to a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSource {
    /// Tab-separated export
    Tsv(PathBuf),
    /// Saved orders web page
    Html(PathBuf),
}

impl OrderSource {
    pub fn path(&self) -> &Path {
        match self {
            OrderSource::Tsv(path) | OrderSource::Html(path) => path,
        }
    }

    fn read_table(&self) -> DaycountResult<RawTable> {
        match self {
            OrderSource::Tsv(path) => tsv_parser::parse_orders_tsv(path),
            OrderSource::Html(path) => html_parser::parse_orders_html(path),
        }
    }
}

/// Row counts gathered while loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub files: usize,
    pub raw_rows: usize,
    pub non_data_rows: usize,
    pub duplicate_rows: usize,
    pub cancelled_rows: usize,
}

/// Result of loading one or more exports
#[derive(Debug)]
pub struct OrderLoadResult {
    pub orders: Vec<OrderRecord>,
    /// Merged header, in first-seen order
    pub columns: Vec<String>,
    pub stats: IngestStats,
}

/// Unified interface for turning order exports into typed records
pub struct OrderLoader;

impl OrderLoader {
    /// Load a single export
    pub fn load_from_file(path: &Path, options: IngestOptions) -> DaycountResult<OrderLoadResult> {
        Self::load_from_files(&[path.to_path_buf()], options)
    }

    /// Load and merge several exports
    pub fn load_from_files(
        paths: &[PathBuf],
        options: IngestOptions,
    ) -> DaycountResult<OrderLoadResult> {
        let sources: Vec<OrderSource> = paths.iter().cloned().map(OrderSource::Tsv).collect();
        Self::load_sources(&sources, options)
    }

    /// Load the orders table of a saved orders web page
    pub fn load_from_html_file(
        path: &Path,
        options: IngestOptions,
    ) -> DaycountResult<OrderLoadResult> {
        Self::load_sources(&[OrderSource::Html(path.to_path_buf())], options)
    }

    /// Load and merge exports of either kind
    pub fn load_sources(
        sources: &[OrderSource],
        options: IngestOptions,
    ) -> DaycountResult<OrderLoadResult> {
        let mut tables = Vec::with_capacity(sources.len());
        for source in sources {
            log::debug!("Reading orders from {}", source.path().display());
            tables.push(source.read_table()?);
        }
        Self::load_tables(tables, options)
    }

    /// Load an export held in memory
    pub fn load_from_str(
        text: &str,
        source_name: &str,
        options: IngestOptions,
    ) -> DaycountResult<OrderLoadResult> {
        let table = tsv_parser::parse_orders_str(text, source_name)?;
        Self::load_tables(vec![table], options)
    }

    /// Clean, merge and type raw tables
    pub fn load_tables(
        tables: Vec<RawTable>,
        options: IngestOptions,
    ) -> DaycountResult<OrderLoadResult> {
        let mut stats = IngestStats {
            files: tables.len(),
            ..IngestStats::default()
        };

        let mut cleaned = Vec::with_capacity(tables.len());
        for table in &tables {
            stats.raw_rows += table.rows.len();
            let (table, removed) = strip_non_data_rows(table);
            stats.non_data_rows += removed;
            cleaned.push(table);
        }

        let mut merged = reconcile_tables(cleaned)?;
        if options.remove_duplicates {
            let (deduped, removed) = remove_duplicate_rows(&merged);
            stats.duplicate_rows = removed;
            merged = deduped;
        }

        let orders = tsv_parser::table_to_orders(&merged)?;
        let (orders, cancelled) = remove_cancelled(orders, options.include_cancelled);
        stats.cancelled_rows = cancelled;

        log::info!(
            "Loaded {} orders from {} file(s) \
             ({} non-data, {} duplicate, {} cancelled rows removed)",
            orders.len(),
            stats.files,
            stats.non_data_rows,
            stats.duplicate_rows,
            stats.cancelled_rows
        );

        Ok(OrderLoadResult {
            orders,
            columns: merged.headers,
            stats,
        })
    }
}
