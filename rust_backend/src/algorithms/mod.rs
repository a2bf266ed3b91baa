//! Daycount algorithms.
//!
//! This module provides the two steps of the daycount engine: clipping order
//! spans to an analysis window and summarising the clipped orders.
//!
//! # Components
//!
//! - [`clipping`]: Clamp orders to a window, drop non-overlapping ones, count inclusive days
//! - [`aggregation`]: Sum day counts by coarse type, fine type, person, or overall
//!
//! # Example
//!
//! ```
//! use nrows_daycount::algorithms::{aggregate, clip_to_window, AggregationMode, UnmappedPolicy};
//! use nrows_daycount::core::{AnalysisWindow, OrderRecord};
//! use chrono::NaiveDate;
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
//! let orders = vec![OrderRecord::new("DOE, JANE", "AT-SC", d(1, 10), d(1, 20), "APPROVED")];
//! let window = AnalysisWindow::new(d(1, 1), d(1, 15)).unwrap();
//!
//! let clipped = clip_to_window(&orders, &window);
//! let result = aggregate(clipped, AggregationMode::Coarse, UnmappedPolicy::Error).unwrap();
//! assert_eq!(result.total_for(&["AT"]), Some(6));
//! ```

pub mod aggregation;
pub mod clipping;

pub use aggregation::{
    aggregate, grand_total, sum_by, Aggregate, AggregationMode, GroupKey, GroupTotal,
    UnmappedPolicy,
};
pub use clipping::{clip_order, clip_to_window, clip_to_window_with_summary, ClipSummary};
