//! Property-based tests for window clipping and aggregation laws.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeSet;

use nrows_daycount::algorithms::{
    aggregate, clip_to_window, grand_total, Aggregate, AggregationMode, UnmappedPolicy,
};
use nrows_daycount::core::{AnalysisWindow, OrderRecord};

const NAMES: [&str; 3] = ["DOE, JANE", "ROE, RICH", "POE, ED"];
const TYPES: [&str; 5] = ["AT-SC", "AT-AT", "ADT-SCRE", "ADT-REIM", "IDTT-RMP"];

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn order_strategy() -> impl Strategy<Value = OrderRecord> {
    (0..NAMES.len(), 0..TYPES.len(), 0i64..730, 0i64..90).prop_map(|(n, t, offset, len)| {
        let start = base() + Duration::days(offset);
        OrderRecord::new(NAMES[n], TYPES[t], start, start + Duration::days(len), "APPROVED")
    })
}

fn window_strategy() -> impl Strategy<Value = AnalysisWindow> {
    (0i64..800, 0i64..400).prop_map(|(offset, len)| {
        let start = base() + Duration::days(offset);
        AnalysisWindow::new(start, start + Duration::days(len)).unwrap()
    })
}

fn overlaps(order: &OrderRecord, window: &AnalysisWindow) -> bool {
    order.start_date <= window.end() && window.start() <= order.end_date
}

proptest! {
    #[test]
    fn prop_superset_window_changes_nothing(
        orders in prop::collection::vec(order_strategy(), 1..40),
    ) {
        let start = orders.iter().map(|o| o.start_date).min().unwrap();
        let end = orders.iter().map(|o| o.end_date).max().unwrap();
        let window =
            AnalysisWindow::new(start - Duration::days(3), end + Duration::days(3)).unwrap();

        let clipped = clip_to_window(&orders, &window);
        prop_assert_eq!(clipped.len(), orders.len());
        for (c, o) in clipped.iter().zip(&orders) {
            prop_assert_eq!(&c.record, o);
            prop_assert_eq!(c.total_days, o.span_days());
        }
    }

    #[test]
    fn prop_clipped_spans_are_inclusive_and_shrink(
        orders in prop::collection::vec(order_strategy(), 0..40),
        window in window_strategy(),
    ) {
        for c in clip_to_window(&orders, &window) {
            prop_assert!(c.start_date() <= c.end_date());
            prop_assert!(window.contains_span(c.start_date(), c.end_date()));
            prop_assert_eq!(c.total_days, (c.end_date() - c.start_date()).num_days() + 1);
            if c.start_date() == c.end_date() {
                prop_assert_eq!(c.total_days, 1);
            }
            let original = orders
                .iter()
                .find(|o| o.name == c.record.name && o.order_type == c.record.order_type
                    && o.start_date <= c.start_date() && c.end_date() <= o.end_date)
                .unwrap();
            prop_assert!(c.total_days <= original.span_days());
        }
    }

    #[test]
    fn prop_non_overlapping_orders_never_survive(
        orders in prop::collection::vec(order_strategy(), 0..40),
        window in window_strategy(),
    ) {
        let expected = orders.iter().filter(|o| overlaps(o, &window)).count();
        prop_assert_eq!(clip_to_window(&orders, &window).len(), expected);
    }

    #[test]
    fn prop_grand_total_independent_of_order(
        orders in prop::collection::vec(order_strategy(), 0..40),
        window in window_strategy(),
    ) {
        let forward = clip_to_window(&orders, &window);
        let mut reversed_input = orders.clone();
        reversed_input.reverse();
        let reversed = clip_to_window(&reversed_input, &window);

        let a = aggregate(forward.clone(), AggregationMode::GrandTotal, UnmappedPolicy::Error)
            .unwrap();
        let b = aggregate(reversed, AggregationMode::GrandTotal, UnmappedPolicy::Error).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, Aggregate::GrandTotal { total_days: grand_total(&forward) });
    }

    #[test]
    fn prop_grouped_totals_partition_grand_total(
        orders in prop::collection::vec(order_strategy(), 0..40),
        window in window_strategy(),
    ) {
        let clipped = clip_to_window(&orders, &window);
        let total = grand_total(&clipped);
        let distinct: BTreeSet<(String, String)> = clipped
            .iter()
            .map(|c| (c.name().to_string(), c.order_type().to_string()))
            .collect();

        let by_type =
            aggregate(clipped.clone(), AggregationMode::PersonByType, UnmappedPolicy::Error)
                .unwrap();
        prop_assert_eq!(by_type.grand_total(), total);
        if let Aggregate::Totals { rows, .. } = &by_type {
            prop_assert_eq!(rows.len(), distinct.len());
        }

        for mode in [AggregationMode::Coarse, AggregationMode::Fine, AggregationMode::PersonTotal] {
            let result = aggregate(clipped.clone(), mode, UnmappedPolicy::Error).unwrap();
            prop_assert_eq!(result.grand_total(), total);
        }
    }
}
