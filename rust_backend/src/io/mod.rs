//! File input and output around the daycount engine.
//!
//! [`loaders`] turns tab-separated order exports and saved orders pages into
//! cleaned, typed records; [`writers`] flattens an aggregate into a table and
//! writes it under a chosen [`WriteMode`].
//!
//! # Example
//!
//! ```no_run
//! use nrows_daycount::io::{IngestOptions, OrderLoader};
//! use std::path::Path;
//!
//! let result = OrderLoader::load_from_file(Path::new("nrows_data.tsv"), IngestOptions::default())
//!     .expect("Failed to load");
//! println!("Loaded {} orders", result.orders.len());
//! ```

pub mod loaders;
pub mod writers;


pub use loaders::{IngestOptions, IngestStats, OrderLoadResult, OrderLoader, OrderSource};
pub use writers::{write_report, ReportTable, WriteMode, TOTAL_DAYS_COLUMN};
