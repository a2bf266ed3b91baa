//! Domain models for personnel orders and analysis windows.
//!
//! This module provides the data structures that flow from ingestion through
//! the daycount engine: the raw order record, the clipped record carrying its
//! inclusive day count, the closed analysis window, and the coarse order
//! categories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DaycountError, DaycountResult};

/// Status value marking a cancelled order in the export.
pub const CANCELLED_STATUS: &str = "CANCEL";

/// A single personnel order as read from the export.
///
/// Records are built once by ingestion and never mutated by the engine.
/// `extra` keeps every column beyond the five the engine needs, in export
/// column order, so the passthrough report can reproduce them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub name: String,
    pub order_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl OrderRecord {
    /// Creates a record with no extra columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrows_daycount::core::domain::OrderRecord;
    /// use chrono::NaiveDate;
    ///
    /// let order = OrderRecord::new(
    ///     "DOE, JANE",
    ///     "AT-SC",
    ///     NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
    ///     "APPROVED",
    /// );
    /// assert_eq!(order.span_days(), 11);
    /// ```
    pub fn new(
        name: impl Into<String>,
        order_type: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            order_type: order_type.into(),
            start_date,
            end_date,
            status: status.into(),
            extra: Vec::new(),
        }
    }

    /// Inclusive day count of the unclipped span.
    ///
    /// Zero or negative when the export carries an end before the start.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Whether the order is marked cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(CANCELLED_STATUS)
    }
}

/// An order whose span has been clipped to an analysis window.
///
/// Only the window clipper constructs these, so `start_date <= end_date`
/// always holds and `total_days >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClippedOrder {
    pub record: OrderRecord,
    pub total_days: i64,
}

impl ClippedOrder {
    pub(crate) fn new(record: OrderRecord) -> Self {
        let total_days = record.span_days();
        Self { record, total_days }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn order_type(&self) -> &str {
        &self.record.order_type
    }

    pub fn start_date(&self) -> NaiveDate {
        self.record.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.record.end_date
    }
}

/// Closed date interval `[start, end]` over which days are counted.
///
/// Construction rejects `start > end`, so every window in circulation is
/// well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl AnalysisWindow {
    /// Creates a window, failing with `InvalidWindow` if `start > end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrows_daycount::core::domain::AnalysisWindow;
    /// use chrono::NaiveDate;
    ///
    /// let jan = AnalysisWindow::new(
    ///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    /// ).unwrap();
    /// assert_eq!(jan.len_days(), 31);
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> DaycountResult<Self> {
        if start > end {
            return Err(DaycountError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive number of days the window covers.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `[start, end]` lies entirely inside the window.
    pub fn contains_span(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= start && end <= self.end
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// High-level order category derived from the order type's two-letter prefix.
///
/// `Unknown` only appears when the caller chose to bucket unmapped prefixes
/// instead of rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoarseOrderType {
    #[serde(rename = "AT")]
    At,
    #[serde(rename = "ADT")]
    Adt,
    #[serde(rename = "IDTT")]
    Idtt,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl CoarseOrderType {
    /// Looks up the category for a full order type code.
    ///
    /// Returns `None` when the first two characters are not `AT`, `AD` or `ID`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrows_daycount::core::domain::CoarseOrderType;
    ///
    /// assert_eq!(CoarseOrderType::from_order_type("ADT-SCRE"), Some(CoarseOrderType::Adt));
    /// assert_eq!(CoarseOrderType::from_order_type("IDTT-RMP"), Some(CoarseOrderType::Idtt));
    /// assert_eq!(CoarseOrderType::from_order_type("XX-1"), None);
    /// ```
    pub fn from_order_type(order_type: &str) -> Option<Self> {
        let prefix: String = order_type.trim().chars().take(2).collect();
        match prefix.as_str() {
            "AT" => Some(CoarseOrderType::At),
            "AD" => Some(CoarseOrderType::Adt),
            "ID" => Some(CoarseOrderType::Idtt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseOrderType::At => "AT",
            CoarseOrderType::Adt => "ADT",
            CoarseOrderType::Idtt => "IDTT",
            CoarseOrderType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CoarseOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
