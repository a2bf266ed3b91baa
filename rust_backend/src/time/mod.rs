//! Calendar date parsing and window-bound resolution.
//!
//! Two textual date forms show up in this tool: window bounds given on the
//! command line as `YYYYMMDD`, and order dates in the export as
//! `YYYY/MM/DD` (sometimes followed by a time of day, which is ignored).

pub mod calendar;

pub use calendar::{
    default_window_start, parse_order_date, parse_window_bound, resolve_window, ORDER_DATE_FORMAT,
    WINDOW_DATE_FORMAT,
};
