use crate::core::domain::OrderRecord;

/// Remove cancelled orders unless `include_cancelled` is set.
///
/// # Returns
/// The kept orders and how many were removed
pub fn remove_cancelled(
    orders: Vec<OrderRecord>,
    include_cancelled: bool,
) -> (Vec<OrderRecord>, usize) {
    if include_cancelled {
        return (orders, 0);
    }
    let before = orders.len();
    let kept: Vec<OrderRecord> = orders.into_iter().filter(|o| !o.is_cancelled()).collect();
    let removed = before - kept.len();
    (kept, removed)
}
