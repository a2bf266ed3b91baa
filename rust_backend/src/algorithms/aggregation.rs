use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::domain::{ClippedOrder, CoarseOrderType};
use crate::error::{DaycountError, DaycountResult};

/// How clipped orders are summarised.
///
/// Each grouping variant knows how to pull its key out of an order (see
/// [`AggregationMode::group_key`]); the summing itself is one generic reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Totals per coarse category (AT, ADT, IDTT)
    #[serde(rename = "coarse", alias = "order_coarse")]
    Coarse,
    /// Totals per exact order type
    #[serde(rename = "fine", alias = "order_fine")]
    Fine,
    /// Totals per (person, order type)
    #[serde(rename = "per-person-by-type", alias = "sailor_orders")]
    PersonByType,
    /// Totals per person
    #[serde(rename = "per-person-total", alias = "sailor_total")]
    PersonTotal,
    /// One sum over every surviving order
    #[serde(rename = "grand-total", alias = "all")]
    GrandTotal,
    /// The clipped orders themselves
    #[serde(rename = "passthrough", alias = "none")]
    Passthrough,
}

impl AggregationMode {
    pub const ALL: [AggregationMode; 6] = [
        AggregationMode::Coarse,
        AggregationMode::Fine,
        AggregationMode::PersonByType,
        AggregationMode::PersonTotal,
        AggregationMode::GrandTotal,
        AggregationMode::Passthrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMode::Coarse => "coarse",
            AggregationMode::Fine => "fine",
            AggregationMode::PersonByType => "per-person-by-type",
            AggregationMode::PersonTotal => "per-person-total",
            AggregationMode::GrandTotal => "grand-total",
            AggregationMode::Passthrough => "passthrough",
        }
    }

    /// Column headers naming the parts of this mode's group key.
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            AggregationMode::Coarse | AggregationMode::Fine => &["Order Type"],
            AggregationMode::PersonByType => &["Name", "Order Type"],
            AggregationMode::PersonTotal => &["Name"],
            AggregationMode::GrandTotal | AggregationMode::Passthrough => &[],
        }
    }

    /// Extract the group key this mode sums `order` under.
    ///
    /// Returns `Ok(None)` for modes that do not group. Fails only for
    /// `Coarse` with an unmapped prefix under [`UnmappedPolicy::Error`].
    pub fn group_key(
        &self,
        order: &ClippedOrder,
        policy: UnmappedPolicy,
    ) -> DaycountResult<Option<GroupKey>> {
        let key = match self {
            AggregationMode::Coarse => {
                GroupKey::Coarse(coarse_category(order.order_type(), policy)?)
            }
            AggregationMode::Fine => GroupKey::OrderType(order.order_type().to_string()),
            AggregationMode::PersonByType => GroupKey::PersonOrderType {
                name: order.name().to_string(),
                order_type: order.order_type().to_string(),
            },
            AggregationMode::PersonTotal => GroupKey::Person(order.name().to_string()),
            AggregationMode::GrandTotal | AggregationMode::Passthrough => return Ok(None),
        };
        Ok(Some(key))
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = DaycountError;

    /// Accepts the canonical tokens plus the legacy script names
    /// (`order_coarse`, `order_fine`, `sailor_orders`, `sailor_total`, `all`, `none`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" | "order_coarse" => Ok(AggregationMode::Coarse),
            "fine" | "order_fine" => Ok(AggregationMode::Fine),
            "per-person-by-type" | "sailor_orders" => Ok(AggregationMode::PersonByType),
            "per-person-total" | "sailor_total" => Ok(AggregationMode::PersonTotal),
            "grand-total" | "all" => Ok(AggregationMode::GrandTotal),
            "passthrough" | "none" => Ok(AggregationMode::Passthrough),
            _ => Err(DaycountError::UnknownMode(s.to_string())),
        }
    }
}

/// What to do with an order type whose prefix has no coarse category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Fail the aggregation naming the offending order type
    #[default]
    #[serde(alias = "reject")]
    Error,
    /// Sum such orders under `UNKNOWN`
    #[serde(alias = "bucket")]
    Unknown,
}

impl FromStr for UnmappedPolicy {
    type Err = DaycountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "reject" => Ok(UnmappedPolicy::Error),
            "unknown" | "bucket" => Ok(UnmappedPolicy::Unknown),
            _ => Err(DaycountError::UnknownPolicy(s.to_string())),
        }
    }
}

fn coarse_category(order_type: &str, policy: UnmappedPolicy) -> DaycountResult<CoarseOrderType> {
    match (CoarseOrderType::from_order_type(order_type), policy) {
        (Some(category), _) => Ok(category),
        (None, UnmappedPolicy::Unknown) => Ok(CoarseOrderType::Unknown),
        (None, UnmappedPolicy::Error) => {
            Err(DaycountError::UnmappedOrderType(order_type.to_string()))
        }
    }
}

/// Key a group of orders is summed under. Ordering drives report row order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Coarse(CoarseOrderType),
    OrderType(String),
    PersonOrderType { name: String, order_type: String },
    Person(String),
}

impl GroupKey {
    /// Key parts in the order of [`AggregationMode::key_columns`].
    pub fn values(&self) -> Vec<&str> {
        match self {
            GroupKey::Coarse(category) => vec![category.as_str()],
            GroupKey::OrderType(order_type) => vec![order_type.as_str()],
            GroupKey::PersonOrderType { name, order_type } => {
                vec![name.as_str(), order_type.as_str()]
            }
            GroupKey::Person(name) => vec![name.as_str()],
        }
    }
}

/// One row of a grouped result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub key: GroupKey,
    pub total_days: i64,
}

/// Result of an aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregate {
    /// Per-key sums, sorted by key
    Totals {
        mode: AggregationMode,
        rows: Vec<GroupTotal>,
    },
    GrandTotal { total_days: i64 },
    Records { orders: Vec<ClippedOrder> },
}

impl Aggregate {
    /// Looks up a grouped total by its key parts, e.g. `&["AT"]` or `&["DOE, JANE", "AT-SC"]`.
    pub fn total_for(&self, key: &[&str]) -> Option<i64> {
        match self {
            Aggregate::Totals { rows, .. } => rows
                .iter()
                .find(|row| row.key.values() == key)
                .map(|row| row.total_days),
            _ => None,
        }
    }

    /// Sum of every day counted in this result.
    pub fn grand_total(&self) -> i64 {
        match self {
            Aggregate::Totals { rows, .. } => rows.iter().map(|r| r.total_days).sum(),
            Aggregate::GrandTotal { total_days } => *total_days,
            Aggregate::Records { orders } => orders.iter().map(|o| o.total_days).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Aggregate::Totals { rows, .. } => rows.is_empty(),
            Aggregate::GrandTotal { .. } => false,
            Aggregate::Records { orders } => orders.is_empty(),
        }
    }
}

/// Sum `total_days` per key produced by `key_fn`.
///
/// Equal keys always land in the same bucket regardless of input order, and
/// the map iterates in key order.
pub fn sum_by<K, F>(orders: &[ClippedOrder], mut key_fn: F) -> DaycountResult<BTreeMap<K, i64>>
where
    K: Ord,
    F: FnMut(&ClippedOrder) -> DaycountResult<K>,
{
    let mut totals = BTreeMap::new();
    for order in orders {
        *totals.entry(key_fn(order)?).or_insert(0) += order.total_days;
    }
    Ok(totals)
}

/// Sum of `total_days` over all orders.
pub fn grand_total(orders: &[ClippedOrder]) -> i64 {
    orders.iter().map(|o| o.total_days).sum()
}

/// Summarise clipped orders under `mode`.
///
/// # Arguments
/// * `orders` - Output of the window clipper
/// * `mode` - Grouping strategy
/// * `policy` - Handling of unmapped coarse prefixes (only consulted by `Coarse`)
///
/// # Returns
/// Empty totals (or a zero grand total) for empty input
pub fn aggregate(
    orders: Vec<ClippedOrder>,
    mode: AggregationMode,
    policy: UnmappedPolicy,
) -> DaycountResult<Aggregate> {
    match mode {
        AggregationMode::Passthrough => Ok(Aggregate::Records { orders }),
        AggregationMode::GrandTotal => Ok(Aggregate::GrandTotal {
            total_days: grand_total(&orders),
        }),
        _ => {
            let totals = sum_by(&orders, |o| {
                mode.group_key(o, policy)?
                    .ok_or_else(|| DaycountError::UnknownMode(mode.to_string()))
            })?;
            let rows = totals
                .into_iter()
                .map(|(key, total_days)| GroupTotal { key, total_days })
                .collect();
            Ok(Aggregate::Totals { mode, rows })
        }
    }
}
