//! Chart Preparation
//!
//! Turns raw aggregate-snapshot rows into chart-ready series by composing
//! the domain pipeline: big-integer parsing at the boundary, Top-N
//! ranking with an `"Other"` bucket, and per-source flow normalization.
//! Rendering itself (chart widgets, colors, tooltips) lives outside this
//! crate.

use crate::domain::amount::AtomicAmount;
use crate::domain::flow::{FlowEdge, FlowShare, normalize_flow};
use crate::domain::ranking::{RankedSlice, rank_top_n};
use crate::domain::snapshot::{AggregateSnapshot, BarRow, GraphRow, OperatorRow};

/// Shorten an entity id for use as a chart label, keeping a `0x`-style
/// prefix and a tail: `0xabcdef...123456`.
///
/// Counts characters, not bytes, so ids with multibyte content never
/// split mid-character.
#[must_use]
pub fn shorten_id(id: &str, chars: usize) -> String {
    let total = id.chars().count();
    if total <= chars * 2 + 2 {
        return id.to_string();
    }
    let prefix: String = id.chars().take(chars + 2).collect();
    let suffix: String = id.chars().skip(total - chars).collect();
    format!("{prefix}...{suffix}")
}

/// Ranked TVL bar series: the `top_n` largest operators plus `"Other"`.
///
/// Amounts are parsed exactly; rows whose amount string is malformed are
/// skipped with a warning rather than corrupting the ranking.
#[must_use]
pub fn tvl_bar_series(rows: &[BarRow], top_n: usize) -> Vec<RankedSlice<AtomicAmount>> {
    let entities = rows
        .iter()
        .filter_map(|row| match row.tvl_total_atomic.parse::<AtomicAmount>() {
            Ok(amount) => Some(RankedSlice::new(shorten_id(&row.operator_id, 6), amount)),
            Err(error) => {
                tracing::warn!(
                    operator_id = %row.operator_id,
                    %error,
                    "Skipping bar row with malformed amount"
                );
                None
            }
        })
        .collect();
    rank_top_n(entities, top_n)
}

/// Ranked AVS-count donut series: operators by AVS count plus `"Other"`.
#[must_use]
pub fn avs_donut_series(rows: &[OperatorRow], top_n: usize) -> Vec<RankedSlice<u64>> {
    let entities = rows
        .iter()
        .map(|row| RankedSlice::new(shorten_id(&row.operator_id, 4), row.avs_count))
        .collect();
    rank_top_n(entities, top_n)
}

/// Select the allocation edges in scope: one token's graph, or every
/// token's graph concatenated when `token` is `None`.
///
/// Scope selection is the only per-token logic; normalization itself is
/// scope-agnostic.
#[must_use]
pub fn graph_edges(snapshot: &AggregateSnapshot, token: Option<&str>) -> Vec<FlowEdge> {
    let rows: Vec<&GraphRow> = match token {
        Some(symbol) => snapshot
            .get(symbol)
            .map(|aggregates| aggregates.graph.iter().collect())
            .unwrap_or_default(),
        None => snapshot
            .values()
            .flat_map(|aggregates| aggregates.graph.iter())
            .collect(),
    };

    rows.into_iter()
        .filter_map(|row| match row.weight_atomic.parse::<AtomicAmount>() {
            Ok(weight) => Some(FlowEdge::new(
                row.operator_id.clone(),
                row.strategy_id.clone(),
                weight,
            )),
            Err(error) => {
                tracing::warn!(
                    operator_id = %row.operator_id,
                    strategy_id = %row.strategy_id,
                    %error,
                    "Skipping graph row with malformed weight"
                );
                None
            }
        })
        .collect()
}

/// Normalized operator → strategy shares for the allocation sankey, with
/// shortened ids for labels.
#[must_use]
pub fn strategy_flow_series(edges: &[FlowEdge], threshold: f64) -> Vec<FlowShare> {
    normalize_flow(edges, threshold)
        .into_iter()
        .map(|share| FlowShare {
            source: shorten_id(&share.source, 6),
            target: shorten_id(&share.target, 6),
            percent: share.percent,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::domain::flow::DEFAULT_SHARE_THRESHOLD;
    use crate::domain::ranking::{BAR_TOP_N, OTHER_LABEL};
    use crate::domain::snapshot::TokenAggregates;

    use super::*;

    fn bar(operator: &str, tvl: &str) -> BarRow {
        BarRow {
            operator_id: operator.to_string(),
            tvl_total_atomic: tvl.to_string(),
        }
    }

    fn graph(operator: &str, strategy: &str, weight: &str) -> GraphRow {
        GraphRow {
            operator_id: operator.to_string(),
            strategy_id: strategy.to_string(),
            weight_atomic: weight.to_string(),
        }
    }

    #[test]
    fn shorten_id_keeps_prefix_and_tail() {
        let id = "0x1234567890abcdef1234567890abcdef12345678";
        assert_eq!(shorten_id(id, 6), "0x123456...345678");
        assert_eq!(shorten_id("0xshort", 6), "0xshort");
    }

    #[test]
    fn shorten_id_handles_multibyte_content() {
        // Short enough to pass through untouched.
        assert_eq!(shorten_id("0xa€€€€€€€€€€", 6), "0xa€€€€€€€€€€");
        // Long enough to shorten across multibyte boundaries.
        let id = format!("0x{}", "é".repeat(20));
        assert_eq!(shorten_id(&id, 4), "0xéééé...éééé");
    }

    #[test]
    fn bar_series_ranks_exactly_and_skips_malformed_rows() {
        let rows = vec![
            bar("0xsmall", "5"),
            bar("0xbroken", "not-a-number"),
            bar("0xhuge", "123456789012345678901234567890123456789"),
        ];
        let series = tvl_bar_series(&rows, BAR_TOP_N);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "0xhuge");
        assert_eq!(series[1].label, "0xsmall");
    }

    #[test]
    fn donut_series_folds_the_tail() {
        let rows: Vec<OperatorRow> = (0..8)
            .map(|i| OperatorRow {
                operator_id: format!("0xoperator{i}"),
                avs_count: 8 - i,
                strategy_count: 1,
                slashing_count: 0,
                last_slash_at: None,
                last_update_block_ts: 0,
                tvl_total_atomic: "1".to_string(),
                hhi_strategy: 0.0,
                nonzero_strategy_count: 1,
            })
            .collect();
        let series = avs_donut_series(&rows, 6);
        assert_eq!(series.len(), 7);
        assert_eq!(series[6].label, OTHER_LABEL);
        assert_eq!(series[6].value, 1 + 2);
    }

    #[test]
    fn graph_edges_scopes_by_token() {
        let mut snapshot = AggregateSnapshot::new();
        snapshot.insert(
            "rETH".to_string(),
            TokenAggregates {
                graph: vec![graph("0xop", "0xs1", "10")],
                ..TokenAggregates::default()
            },
        );
        snapshot.insert(
            "stETH".to_string(),
            TokenAggregates {
                graph: vec![graph("0xop", "0xs2", "30")],
                ..TokenAggregates::default()
            },
        );

        assert_eq!(graph_edges(&snapshot, Some("rETH")).len(), 1);
        assert_eq!(graph_edges(&snapshot, Some("missing")).len(), 0);
        assert_eq!(graph_edges(&snapshot, None).len(), 2);
    }

    #[test]
    fn flow_series_normalizes_and_filters() {
        let edges = vec![
            FlowEdge::new("0xop", "0xmain", "990".parse().unwrap()),
            FlowEdge::new("0xop", "0xdust", "10".parse().unwrap()),
        ];
        let shares = strategy_flow_series(&edges, DEFAULT_SHARE_THRESHOLD);
        assert_eq!(shares.len(), 2);
        assert!((shares[0].percent - 99.0).abs() < f64::EPSILON);
        assert!((shares[1].percent - 1.0).abs() < f64::EPSILON);
    }
}
