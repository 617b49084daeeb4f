//! Top-N Rank Aggregation
//!
//! Collapses an unbounded set of ranked entities into a fixed-size Top-N
//! view for charting without losing aggregate mass: the N largest
//! entities survive as named slices and everything beyond the cutoff is
//! folded into a single synthetic `"Other"` slice.
//!
//! The aggregation is generic over the slice value so the same path
//! serves TVL bars ([`AtomicAmount`](crate::domain::amount::AtomicAmount))
//! and AVS-count donuts (`u64`); the remainder sum is always exact
//! integer or big-integer addition, never floating accumulation.

use num_traits::Zero;

/// Label of the synthetic remainder slice.
pub const OTHER_LABEL: &str = "Other";

/// Default slice count for donut views.
pub const DONUT_TOP_N: usize = 6;

/// Default slice count for bar views.
pub const BAR_TOP_N: usize = 5;

/// One ranked entity: a display label and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSlice<V> {
    /// Display label (entity id, or [`OTHER_LABEL`] for the remainder).
    pub label: String,
    /// Ranked value.
    pub value: V,
}

impl<V> RankedSlice<V> {
    /// Create a slice.
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Collapse `entities` into at most `top_n` slices plus one `"Other"`.
///
/// Zero-valued entities are filtered out before ranking so they never
/// occupy a Top-N slot. Survivors are sorted descending by value with
/// ties keeping input order (stable sort, no secondary key). When more
/// than `top_n` remain, the tail is summed exactly into one `"Other"`
/// slice appended last; the slice is omitted if that sum is zero.
///
/// `top_n` must be positive; zero is clamped to 1.
#[must_use]
pub fn rank_top_n<V: Zero + Ord>(entities: Vec<RankedSlice<V>>, top_n: usize) -> Vec<RankedSlice<V>> {
    let top_n = top_n.max(1);

    let mut ranked: Vec<RankedSlice<V>> = entities
        .into_iter()
        .filter(|entity| !entity.value.is_zero())
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));

    if ranked.len() <= top_n {
        return ranked;
    }

    let tail = ranked.split_off(top_n);
    let other = tail
        .into_iter()
        .fold(V::zero(), |sum, entity| sum + entity.value);
    if !other.is_zero() {
        ranked.push(RankedSlice::new(OTHER_LABEL, other));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use crate::domain::amount::AtomicAmount;

    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Vec<RankedSlice<u64>> {
        pairs
            .iter()
            .map(|&(label, value)| RankedSlice::new(label, value))
            .collect()
    }

    #[test]
    fn all_entities_fit_without_other() {
        let slices = rank_top_n(counts(&[("a", 3), ("b", 7), ("c", 5)]), 3);
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["b", "c", "a"]);
    }

    #[test]
    fn tail_collapses_into_other() {
        let slices = rank_top_n(counts(&[("a", 10), ("b", 8), ("c", 3), ("d", 2), ("e", 1)]), 2);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].label, "a");
        assert_eq!(slices[1].label, "b");
        assert_eq!(slices[2].label, OTHER_LABEL);
        assert_eq!(slices[2].value, 6);
    }

    #[test]
    fn zero_valued_entities_never_become_slices() {
        let slices = rank_top_n(counts(&[("a", 0), ("b", 4), ("c", 0), ("d", 2)]), 6);
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["b", "d"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let slices = rank_top_n(counts(&[("first", 5), ("second", 5), ("third", 5)]), 3);
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["first", "second", "third"]);
    }

    #[test]
    fn zero_top_n_clamps_to_one() {
        let slices = rank_top_n(counts(&[("a", 2), ("b", 1)]), 0);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "a");
        assert_eq!(slices[1].label, OTHER_LABEL);
        assert_eq!(slices[1].value, 1);
    }

    #[test]
    fn other_sum_is_exact_for_big_amounts() {
        let huge = "100000000000000000000000000000000000001";
        let entities = vec![
            RankedSlice::new("top", "900000000000000000000000000000000000000".parse::<AtomicAmount>().unwrap()),
            RankedSlice::new("mid", huge.parse::<AtomicAmount>().unwrap()),
            RankedSlice::new("low", huge.parse::<AtomicAmount>().unwrap()),
        ];
        let slices = rank_top_n(entities, 1);
        assert_eq!(slices.len(), 2);
        assert_eq!(
            slices[1].value.to_string(),
            "200000000000000000000000000000000000002"
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let slices = rank_top_n(Vec::<RankedSlice<u64>>::new(), 5);
        assert!(slices.is_empty());
    }
}
