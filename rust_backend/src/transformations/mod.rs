//! Cleaning and filtering applied between parsing and the daycount engine.
//!
//! # Modules
//!
//! - [`cleaning`]: Strip blank and repeated-header rows, merge exports, drop duplicate rows
//! - [`filtering`]: Remove cancelled orders
//!
//! # Example
//!
//! ```
//! use nrows_daycount::parsing::{parse_orders_str, table_to_orders};
//! use nrows_daycount::transformations::{remove_cancelled, strip_non_data_rows};
//!
//! let text = "Name\tOrder Type\tStart Date\tEnd Date\tStatus\n\
//!             A\tAT-AT\t2024/01/01\t2024/01/02\tAPPROVED\n\
//!             Name\tOrder Type\tStart Date\tEnd Date\tStatus\n\
//!             B\tAT-SC\t2024/01/01\t2024/01/02\tCANCEL\n";
//! let table = parse_orders_str(text, "inline").unwrap();
//! let (table, _) = strip_non_data_rows(&table);
//! let (orders, cancelled) = remove_cancelled(table_to_orders(&table).unwrap(), false);
//! assert_eq!(orders.len(), 1);
//! assert_eq!(cancelled, 1);
//! ```

pub mod cleaning;
pub mod filtering;

pub use cleaning::{
    is_blank_row, is_header_row, reconcile_tables, remove_duplicate_rows, strip_non_data_rows,
};
pub use filtering::remove_cancelled;
