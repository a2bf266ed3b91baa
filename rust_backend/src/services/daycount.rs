use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithms::aggregation::{aggregate, Aggregate, AggregationMode, UnmappedPolicy};
use crate::algorithms::clipping::{clip_to_window_with_summary, ClipSummary};
use crate::core::domain::{AnalysisWindow, OrderRecord};
use crate::error::DaycountResult;
use crate::time::resolve_window;

/// Everything the engine needs for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaycountRequest {
    pub window: AnalysisWindow,
    pub mode: AggregationMode,
    pub unmapped: UnmappedPolicy,
}

impl DaycountRequest {
    pub fn new(window: AnalysisWindow, mode: AggregationMode, unmapped: UnmappedPolicy) -> Self {
        Self {
            window,
            mode,
            unmapped,
        }
    }

    /// Build a request from textual window bounds.
    ///
    /// `today` stands in for a missing end bound and for the literal `today`.
    /// Fails before any order is looked at if a bound is malformed or the
    /// window is inverted.
    pub fn from_bounds(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        mode: AggregationMode,
        unmapped: UnmappedPolicy,
    ) -> DaycountResult<Self> {
        let window = resolve_window(start, end, today)?;
        Ok(Self::new(window, mode, unmapped))
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaycountOutcome {
    pub window: AnalysisWindow,
    pub mode: AggregationMode,
    pub clip_summary: ClipSummary,
    pub aggregate: Aggregate,
}

/// Clip `orders` to the request window and aggregate them.
///
/// # Arguments
/// * `orders` - Ingested orders; not modified
/// * `request` - Window, mode and unmapped-prefix policy
///
/// # Returns
/// The aggregate together with clipping counts
pub fn run_daycount(
    orders: &[OrderRecord],
    request: &DaycountRequest,
) -> DaycountResult<DaycountOutcome> {
    let (clipped, clip_summary) = clip_to_window_with_summary(orders, &request.window);
    log::info!(
        "Window {}: kept {} of {} orders ({} truncated, {} outside window)",
        request.window,
        clip_summary.kept_records,
        clip_summary.input_records,
        clip_summary.truncated_records,
        clip_summary.dropped_records
    );

    let aggregate = aggregate(clipped, request.mode, request.unmapped)?;
    log::debug!(
        "Aggregated with mode {}: {} day(s) counted",
        request.mode,
        aggregate.grand_total()
    );

    Ok(DaycountOutcome {
        window: request.window,
        mode: request.mode,
        clip_summary,
        aggregate,
    })
}
