//! Source-Normalized Flow Shares
//!
//! Turns a raw `(source, target, weight)` edge list into chart-ready
//! percentage triples. Weights are atomic amounts that routinely exceed
//! `f64`'s safe-integer range, so each share is computed by scaled
//! big-integer division before any floating conversion: the rounding
//! behavior is identical at every magnitude.

use std::collections::HashMap;

use num_traits::ToPrimitive;

use crate::domain::amount::AtomicAmount;

/// Fixed scale applied before integer division; yields four significant
/// decimal digits per share.
pub const SHARE_SCALE: u32 = 10_000;

/// Default minimum share below which an edge is hidden (1%).
///
/// A display-density control, not a correctness rule: it is applied
/// strictly after normalization.
pub const DEFAULT_SHARE_THRESHOLD: f64 = 0.01;

/// A weighted allocation edge from one source entity to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    /// Source entity id (e.g. operator).
    pub source: String,
    /// Target entity id (e.g. strategy).
    pub target: String,
    /// Allocation weight in atomic units.
    pub weight: AtomicAmount,
}

impl FlowEdge {
    /// Create an edge.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        weight: AtomicAmount,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// A normalized edge: the share of its source's total, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowShare {
    /// Source entity id.
    pub source: String,
    /// Target entity id.
    pub target: String,
    /// Share of the source's total outgoing weight, `0.0..=100.0`.
    pub percent: f64,
}

/// Normalize `edges` to per-source shares, dropping shares below
/// `threshold` (a fraction, e.g. `0.01` for 1%).
///
/// Per-source totals are exact big-integer sums. Edges whose source total
/// is zero have an undefined proportion and are dropped entirely. The
/// threshold filter runs after normalization only — filtering first would
/// corrupt the surviving shares' sum. Output preserves input edge order;
/// no sort is imposed.
#[must_use]
pub fn normalize_flow(edges: &[FlowEdge], threshold: f64) -> Vec<FlowShare> {
    let mut totals: HashMap<&str, AtomicAmount> = HashMap::new();
    for edge in edges {
        *totals.entry(edge.source.as_str()).or_default() += &edge.weight;
    }

    edges
        .iter()
        .filter_map(|edge| {
            let total = totals.get(edge.source.as_str())?;
            if total.is_zero() {
                return None;
            }
            let scaled = edge.weight.as_biguint() * SHARE_SCALE / total.as_biguint();
            // scaled <= SHARE_SCALE, always representable.
            let share = scaled.to_f64()? / f64::from(SHARE_SCALE);
            if share < threshold {
                return None;
            }
            Some(FlowShare {
                source: edge.source.clone(),
                target: edge.target.clone(),
                percent: share * 100.0,
            })
        })
        .collect()
}
