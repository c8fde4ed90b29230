//! Reverse ranking and rank filtering.

use crate::result::RankedRow;
use crate::traits::AncestryNode;

/// How rows with equal depth are numbered in `rank_from_tip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RankingMode {
    /// Ties share a rank and the next rank follows without a gap (`dense_rank`).
    #[default]
    Dense,
    /// Ties share a rank and the next rank skips past them (`rank`).
    Standard,
}

impl RankingMode {
    /// Computes `rank_from_tip` for one tree partition.
    ///
    /// `depths` holds each row's `rank_from_root`; the output is aligned with
    /// it. The deepest rows get rank 1.
    ///
    /// ```rust
    /// use ancestry_joins::RankingMode;
    ///
    /// // b1 at depth 1, siblings b2 and b22 at depth 2
    /// assert_eq!(RankingMode::Dense.tip_ranks(&[1, 2, 2]), vec![2, 1, 1]);
    /// assert_eq!(RankingMode::Standard.tip_ranks(&[1, 2, 2]), vec![3, 1, 1]);
    /// ```
    pub fn tip_ranks(self, depths: &[usize]) -> Vec<usize> {
        let mut deeper_first = depths.to_vec();
        deeper_first.sort_unstable_by(|a, b| b.cmp(a));
        if self == Self::Dense {
            deeper_first.dedup();
        }

        depths
            .iter()
            .map(|depth| deeper_first.partition_point(|other| other > depth) + 1)
            .collect()
    }

    /// SQL window function implementing this mode.
    pub fn window_function(self) -> &'static str {
        match self {
            Self::Dense => "dense_rank()",
            Self::Standard => "rank()",
        }
    }
}

/// Post-filter on forward and reverse rank.
///
/// Both bounds combine with AND; an empty filter keeps every row. Ranks are
/// 1-based, so a bound of 0 matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankFilter {
    /// Keep rows with `rank_from_root == nth`.
    pub nth: Option<usize>,
    /// Keep rows with `rank_from_tip == nth_reverse`.
    pub nth_reverse: Option<usize>,
}

impl RankFilter {
    /// Creates an identity filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given rank from the root.
    pub fn nth(mut self, nth: usize) -> Self {
        self.nth = Some(nth);
        self
    }

    /// Restricts to the given rank from the tip.
    pub fn nth_reverse(mut self, nth_reverse: usize) -> Self {
        self.nth_reverse = Some(nth_reverse);
        self
    }

    /// Returns true if the filter keeps every row.
    pub fn is_identity(&self) -> bool {
        self.nth.is_none() && self.nth_reverse.is_none()
    }

    /// Checks a single pair of ranks.
    pub fn matches(&self, rank_from_root: usize, rank_from_tip: usize) -> bool {
        self.nth.map_or(true, |nth| nth == rank_from_root)
            && self
                .nth_reverse
                .map_or(true, |nth_reverse| nth_reverse == rank_from_tip)
    }

    /// Keeps only the rows matching this filter, preserving order.
    pub fn apply<N: AncestryNode>(&self, mut rows: Vec<RankedRow<N>>) -> Vec<RankedRow<N>> {
        if !self.is_identity() {
            rows.retain(|row| self.matches(row.rank_from_root, row.rank_from_tip));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_ranks_linear_chain() {
        assert_eq!(RankingMode::Dense.tip_ranks(&[1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(RankingMode::Standard.tip_ranks(&[1, 2, 3]), vec![3, 2, 1]);
    }

    #[test]
    fn test_tip_ranks_single_row() {
        assert_eq!(RankingMode::Dense.tip_ranks(&[4]), vec![1]);
    }

    #[test]
    fn test_tip_ranks_empty() {
        assert!(RankingMode::Dense.tip_ranks(&[]).is_empty());
    }

    #[test]
    fn test_tip_ranks_ties_dense_vs_standard() {
        let depths = [1, 2, 2, 3, 3, 3];
        assert_eq!(RankingMode::Dense.tip_ranks(&depths), vec![3, 2, 2, 1, 1, 1]);
        assert_eq!(
            RankingMode::Standard.tip_ranks(&depths),
            vec![6, 4, 4, 1, 1, 1]
        );
    }

    #[test]
    fn test_tip_ranks_subtree_gap() {
        // Only depths 2 and 5 were touched by the query.
        assert_eq!(RankingMode::Dense.tip_ranks(&[5, 2]), vec![1, 2]);
    }

    #[test]
    fn test_window_function() {
        assert_eq!(RankingMode::Dense.window_function(), "dense_rank()");
        assert_eq!(RankingMode::Standard.window_function(), "rank()");
    }

    #[test]
    fn test_rank_filter_identity() {
        let filter = RankFilter::new();
        assert!(filter.is_identity());
        assert!(filter.matches(1, 1));
        assert!(filter.matches(7, 3));
    }

    #[test]
    fn test_rank_filter_nth() {
        let filter = RankFilter::new().nth(1);
        assert!(filter.matches(1, 5));
        assert!(!filter.matches(2, 1));
    }

    #[test]
    fn test_rank_filter_nth_reverse() {
        let filter = RankFilter::new().nth_reverse(1);
        assert!(filter.matches(3, 1));
        assert!(!filter.matches(3, 2));
    }

    #[test]
    fn test_rank_filter_combined_is_and() {
        let filter = RankFilter::new().nth(2).nth_reverse(1);
        assert!(filter.matches(2, 1));
        assert!(!filter.matches(2, 2));
        assert!(!filter.matches(1, 1));
    }

    #[test]
    fn test_rank_filter_zero_matches_nothing() {
        let filter = RankFilter::new().nth(0);
        assert!(!filter.matches(1, 1));
    }
}
