use chrono::NaiveDate;

use crate::core::domain::AnalysisWindow;
use crate::error::{DaycountError, DaycountResult};

/// Format of window bounds supplied by the caller (no separators).
pub const WINDOW_DATE_FORMAT: &str = "%Y%m%d";

/// Format of start/end dates in the orders export.
pub const ORDER_DATE_FORMAT: &str = "%Y/%m/%d";

/// Literal accepted in place of a window bound to mean the injected current date.
const TODAY: &str = "today";

/// Earliest window start used when the caller gives none (1970-01-01).
pub fn default_window_start() -> NaiveDate {
    NaiveDate::default()
}

/// Parse a window bound in `YYYYMMDD` form.
///
/// # Examples
/// ```
/// use nrows_daycount::time::parse_window_bound;
/// use chrono::NaiveDate;
///
/// let date = parse_window_bound("20240131").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
/// assert!(parse_window_bound("2024-01-31").is_err());
/// ```
pub fn parse_window_bound(value: &str) -> DaycountResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DaycountError::invalid_date(value, "YYYYMMDD"));
    }
    NaiveDate::parse_from_str(trimmed, WINDOW_DATE_FORMAT)
        .map_err(|_| DaycountError::invalid_date(value, "YYYYMMDD"))
}

/// Parse an order date in `YYYY/MM/DD` form.
///
/// A trailing time of day (`2024/01/10 00:00:00`) is tolerated and dropped.
pub fn parse_order_date(value: &str) -> DaycountResult<NaiveDate> {
    let date_part = value
        .split_whitespace()
        .next()
        .ok_or_else(|| DaycountError::invalid_date(value, "YYYY/MM/DD"))?;
    NaiveDate::parse_from_str(date_part, ORDER_DATE_FORMAT)
        .map_err(|_| DaycountError::invalid_date(value, "YYYY/MM/DD"))
}

fn resolve_bound(
    value: Option<&str>,
    fallback: NaiveDate,
    today: NaiveDate,
) -> DaycountResult<NaiveDate> {
    match value.map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(v) if v.eq_ignore_ascii_case(TODAY) => Ok(today),
        Some(v) => parse_window_bound(v),
    }
}

/// Build the analysis window from optional caller-supplied bounds.
///
/// A missing start defaults to 1970-01-01 and a missing end to `today`;
/// either bound may also be the literal `today`. The current date is
/// passed in rather than read from the clock so callers control it.
///
/// # Errors
/// Returns `InvalidDate` for an unparsable bound and `InvalidWindow` when
/// the resolved start falls after the resolved end.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> DaycountResult<AnalysisWindow> {
    let start = resolve_bound(start, default_window_start(), today)?;
    let end = resolve_bound(end, today, today)?;
    AnalysisWindow::new(start, end)
}
