//! Aggregate Snapshot Model
//!
//! Serde models of the per-token aggregate document served by the
//! backend: per-operator table rows, the TVL bar series, and the
//! operator → strategy allocation graph. Every amount-bearing field is a
//! decimal string, never a native number, so arbitrary precision is
//! preserved end to end; parsing into
//! [`AtomicAmount`](crate::domain::amount::AtomicAmount) happens at the
//! aggregation boundary, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One per-operator row of the dashboard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorRow {
    /// Operator id.
    pub operator_id: String,
    /// Number of AVS entities the operator serves.
    pub avs_count: u64,
    /// Number of strategies the operator allocates to.
    pub strategy_count: u64,
    /// Number of slashing events recorded against the operator.
    pub slashing_count: u64,
    /// Timestamp of the most recent slash, if any.
    pub last_slash_at: Option<i64>,
    /// Block timestamp of the operator's last update.
    pub last_update_block_ts: i64,
    /// Total value locked, atomic units as a decimal string.
    pub tvl_total_atomic: String,
    /// Herfindahl-Hirschman concentration index over strategies.
    pub hhi_strategy: f64,
    /// Number of strategies with a non-zero allocation.
    pub nonzero_strategy_count: u64,
}

/// One bar of the TVL bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRow {
    /// Operator id.
    pub operator_id: String,
    /// Total value locked, atomic units as a decimal string.
    pub tvl_total_atomic: String,
}

/// One edge of the operator → strategy allocation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRow {
    /// Operator id (edge source).
    pub operator_id: String,
    /// Strategy id (edge target).
    pub strategy_id: String,
    /// Allocation weight, atomic units as a decimal string.
    pub weight_atomic: String,
}

/// Aggregates for a single token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAggregates {
    /// Per-operator table rows.
    #[serde(default)]
    pub table: Vec<OperatorRow>,
    /// TVL bar series.
    #[serde(default)]
    pub bar: Vec<BarRow>,
    /// Operator → strategy allocation edges.
    #[serde(default)]
    pub graph: Vec<GraphRow>,
}

/// The full aggregate snapshot, keyed by token symbol.
pub type AggregateSnapshot = BTreeMap<String, TokenAggregates>;
