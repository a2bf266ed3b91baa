use serde::Serialize;

use crate::core::domain::{AnalysisWindow, ClippedOrder, OrderRecord};

/// Counts describing what a clipping pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClipSummary {
    pub input_records: usize,
    pub kept_records: usize,
    pub dropped_records: usize,
    pub truncated_records: usize,
}

/// Clip a single order to the window.
///
/// Returns `None` when the order has no day in common with the window.
/// The input record is left untouched; survivors are fresh copies with
/// their dates clamped and `total_days` computed inclusively.
pub fn clip_order(order: &OrderRecord, window: &AnalysisWindow) -> Option<ClippedOrder> {
    let start = order.start_date.max(window.start());
    let end = order.end_date.min(window.end());
    if start > end {
        return None;
    }

    let mut clipped = order.clone();
    clipped.start_date = start;
    clipped.end_date = end;
    Some(ClippedOrder::new(clipped))
}

/// Clip every order to the window, dropping those entirely outside it.
///
/// # Arguments
/// * `orders` - Orders with typed start/end dates
/// * `window` - Closed analysis window
///
/// # Returns
/// Surviving orders in input order, each with `total_days` populated
pub fn clip_to_window(orders: &[OrderRecord], window: &AnalysisWindow) -> Vec<ClippedOrder> {
    clip_to_window_with_summary(orders, window).0
}

/// Same as [`clip_to_window`], also reporting how many orders were dropped or truncated.
pub fn clip_to_window_with_summary(
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> (Vec<ClippedOrder>, ClipSummary) {
    let mut summary = ClipSummary {
        input_records: orders.len(),
        ..ClipSummary::default()
    };

    let mut clipped = Vec::with_capacity(orders.len());
    for order in orders {
        if order.start_date > order.end_date {
            log::debug!(
                "Order for '{}' ({}) ends {} before it starts {}; dropping",
                order.name,
                order.order_type,
                order.end_date,
                order.start_date
            );
        }

        match clip_order(order, window) {
            Some(c) => {
                if !window.contains_span(order.start_date, order.end_date) {
                    summary.truncated_records += 1;
                }
                clipped.push(c);
            }
            None => summary.dropped_records += 1,
        }
    }
    summary.kept_records = clipped.len();

    (clipped, summary)
}
