//! Parsers for the orders export.
//!
//! The export is the orders table saved as tab-separated values: one header
//! row naming at least `Name`, `Order Type`, `Start Date`, `End Date` and
//! `Status`, then one row per order. The same table can also be read
//! straight from the saved orders web page.
//!
//! # Parsers
//!
//! - [`tsv_parser`]: Read exports into raw tables and type them into
//!   [`OrderRecord`](crate::core::OrderRecord)s
//! - [`html_parser`]: Pull the orders table out of a saved orders web page
//!
//! # Example
//!
//! ```no_run
//! use nrows_daycount::parsing::tsv_parser::{parse_orders_tsv, table_to_orders};
//! use std::path::Path;
//!
//! let table = parse_orders_tsv(Path::new("nrows_data.tsv")).expect("Failed to read export");
//! let orders = table_to_orders(&table).expect("Failed to type rows");
//! ```

pub mod html_parser;
pub mod tsv_parser;


pub use html_parser::{parse_orders_html, parse_orders_html_str, ORDERS_TABLE_INDEX};
pub use tsv_parser::{
    parse_orders_str, parse_orders_tsv, read_raw_table, table_to_orders, RawTable,
    REQUIRED_COLUMNS,
};
