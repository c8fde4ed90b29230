//! Result types for ancestor expansion.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::rank::RankFilter;
use crate::traits::AncestryNode;

/// One ancestor row with its tree key and ranks.
///
/// The wrapped node is the ancestor's full row as returned by the store.
/// A `RankedRow` is itself an [`AncestryNode`], so a result can seed another
/// expansion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankedRow<N: AncestryNode> {
    /// The ancestor's full row.
    pub node: N,
    /// Forest root of the tree this row belongs to.
    pub root_id: N::Id,
    /// 1-based depth counted from the root.
    pub rank_from_root: usize,
    /// 1-based rank counted from the deepest row of the same tree in this result.
    pub rank_from_tip: usize,
}

impl<N: AncestryNode> RankedRow<N> {
    /// Returns the ancestor's id.
    pub fn id(&self) -> &N::Id {
        self.node.id()
    }

    /// Returns true if this row is one of the deepest of its tree in the result.
    pub fn is_tip(&self) -> bool {
        self.rank_from_tip == 1
    }

    /// Returns true if this row is the forest root.
    pub fn is_root(&self) -> bool {
        self.rank_from_root == 1
    }
}

impl<N: AncestryNode> AncestryNode for RankedRow<N> {
    type Id = N::Id;

    fn id(&self) -> &Self::Id {
        self.node.id()
    }

    fn ancestry(&self) -> Option<&str> {
        self.node.ancestry()
    }
}

/// Ranked, deduplicated ancestor rows plus execution statistics.
///
/// Rows are grouped by tree in the order their first base row appeared, and
/// ordered root first within each tree. The set stays composable: it can be
/// filtered, re-ranked by position, sorted, or used as the base of another
/// expansion.
///
/// # Example
///
/// ```ignore
/// let result = executor.with_ancestors(&base, AncestorScope::default())?;
///
/// println!("Found {} rows", result.count());
///
/// let parents = result.clone().nth_reverse(2);
/// for row in &parents {
///     println!("{} at depth {}", row.id(), row.rank_from_root);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RankedRows<N: AncestryNode> {
    /// The ranked rows.
    pub rows: Vec<RankedRow<N>>,
    /// Execution statistics.
    pub stats: ExecutionStats,
}

impl<N: AncestryNode> RankedRows<N> {
    /// Creates a result from rows and stats.
    pub fn new(rows: Vec<RankedRow<N>>, stats: ExecutionStats) -> Self {
        Self { rows, stats }
    }

    /// Creates an empty result.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            stats: ExecutionStats::default(),
        }
    }

    /// Returns the number of rows.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedRow<N>> {
        self.rows.iter()
    }

    /// Returns the ids of all rows, in result order.
    pub fn ids(&self) -> Vec<&N::Id> {
        self.rows.iter().map(RankedRow::id).collect()
    }

    /// Checks whether a node id is present.
    pub fn contains(&self, id: &N::Id) -> bool {
        self.rows.iter().any(|row| row.id() == id)
    }

    /// Returns the first row with the given node id.
    pub fn get(&self, id: &N::Id) -> Option<&RankedRow<N>> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Keeps the rows matching `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&RankedRow<N>) -> bool,
    {
        self.rows.retain(predicate);
        self
    }

    /// Keeps the rows at the given rank from the root.
    pub fn nth(self, nth: usize) -> Self {
        self.apply(RankFilter::new().nth(nth))
    }

    /// Keeps the rows at the given rank from the tip.
    pub fn nth_reverse(self, nth_reverse: usize) -> Self {
        self.apply(RankFilter::new().nth_reverse(nth_reverse))
    }

    /// Applies a rank filter to the rows already ranked.
    pub fn apply(mut self, filter: RankFilter) -> Self {
        self.rows = filter.apply(self.rows);
        self
    }

    /// Sorts rows with a comparator (stable).
    pub fn sort_by<F>(mut self, compare: F) -> Self
    where
        F: FnMut(&RankedRow<N>, &RankedRow<N>) -> Ordering,
    {
        self.rows.sort_by(compare);
        self
    }

    /// Groups rows by forest root.
    pub fn group_by_root(&self) -> BTreeMap<&N::Id, Vec<&RankedRow<N>>> {
        let mut groups: BTreeMap<&N::Id, Vec<&RankedRow<N>>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(&row.root_id).or_default().push(row);
        }
        groups
    }

    /// Returns the rows, dropping the statistics.
    pub fn into_rows(self) -> Vec<RankedRow<N>> {
        self.rows
    }

    /// Returns the bare nodes, dropping ranks and statistics.
    pub fn into_nodes(self) -> Vec<N> {
        self.rows.into_iter().map(|row| row.node).collect()
    }
}

impl<N: AncestryNode> IntoIterator for RankedRows<N> {
    type Item = RankedRow<N>;
    type IntoIter = std::vec::IntoIter<RankedRow<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, N: AncestryNode> IntoIterator for &'a RankedRows<N> {
    type Item = &'a RankedRow<N>;
    type IntoIter = std::slice::Iter<'a, RankedRow<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Statistics from one expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionStats {
    /// Total execution duration.
    pub duration: Duration,
    /// Number of base rows supplied.
    pub base_rows: usize,
    /// Number of distinct ancestor ids requested from the store.
    pub distinct_ancestors: usize,
    /// Number of bulk fetches issued (0 or 1).
    pub store_fetches: usize,
    /// Ancestor ids referenced by a path but missing from the store.
    pub dangling_ancestors: usize,
    /// Rows returned after rank filtering.
    pub rows_emitted: usize,
}

impl ExecutionStats {
    /// Duration in whole microseconds, saturating at `u64::MAX`.
    pub fn duration_micros(&self) -> u64 {
        u64::try_from(self.duration.as_micros()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        ancestry: Option<String>,
    }

    impl AncestryNode for Row {
        type Id = i64;

        fn id(&self) -> &i64 {
            &self.id
        }

        fn ancestry(&self) -> Option<&str> {
            self.ancestry.as_deref()
        }
    }

    fn ranked(id: i64, root: i64, from_root: usize, from_tip: usize) -> RankedRow<Row> {
        RankedRow {
            node: Row { id, ancestry: None },
            root_id: root,
            rank_from_root: from_root,
            rank_from_tip: from_tip,
        }
    }

    fn sample() -> RankedRows<Row> {
        RankedRows::new(
            vec![
                ranked(1, 1, 1, 3),
                ranked(2, 1, 2, 2),
                ranked(3, 1, 3, 1),
                ranked(4, 4, 1, 2),
                ranked(5, 4, 2, 1),
            ],
            ExecutionStats::default(),
        )
    }

    #[test]
    fn test_ranked_rows_empty() {
        let result: RankedRows<Row> = RankedRows::empty();
        assert_eq!(result.count(), 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_ranked_rows_lookup() {
        let result = sample();
        assert_eq!(result.count(), 5);
        assert!(result.contains(&3));
        assert!(!result.contains(&9));
        assert_eq!(result.get(&2).map(|r| r.rank_from_root), Some(2));
        assert_eq!(result.ids(), vec![&1, &2, &3, &4, &5]);
    }

    #[test]
    fn test_ranked_rows_nth() {
        let roots = sample().nth(1);
        let ids: Vec<i64> = roots.iter().map(|r| r.node.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_ranked_rows_nth_reverse() {
        let tips = sample().nth_reverse(1);
        let ids: Vec<i64> = tips.iter().map(|r| r.node.id).collect();
        assert_eq!(ids, vec![3, 5]);
        assert!(tips.iter().all(RankedRow::is_tip));
    }

    #[test]
    fn test_ranked_rows_filter_and_sort() {
        let result = sample()
            .filter(|r| r.root_id == 1)
            .sort_by(|a, b| b.rank_from_root.cmp(&a.rank_from_root));
        let ids: Vec<i64> = result.iter().map(|r| r.node.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_group_by_root() {
        let result = sample();
        let groups = result.group_by_root();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&&1_i64].len(), 3);
        assert_eq!(groups[&&4_i64].len(), 2);
    }

    #[test]
    fn test_into_nodes() {
        let nodes = sample().nth(2).into_nodes();
        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn test_ranked_row_is_node() {
        let row = ranked(3, 1, 3, 1);
        assert_eq!(*AncestryNode::id(&row), 3);
        assert!(row.is_tip());
        assert!(!row.is_root());
    }

    #[test]
    fn test_into_iter() {
        let result = sample();
        let mut count = 0;
        for row in &result {
            assert!(row.rank_from_root >= 1);
            count += 1;
        }
        assert_eq!(count, 5);
        assert_eq!(result.into_iter().count(), 5);
    }

    #[test]
    fn test_duration_micros_saturates() {
        let stats = ExecutionStats {
            duration: Duration::from_micros(1_500),
            ..ExecutionStats::default()
        };
        assert_eq!(stats.duration_micros(), 1_500);

        let stats = ExecutionStats {
            duration: Duration::MAX,
            ..ExecutionStats::default()
        };
        assert_eq!(stats.duration_micros(), u64::MAX);
    }
}
