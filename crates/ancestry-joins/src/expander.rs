//! Ancestor expansion over materialized paths.
//!
//! This module provides the [`AncestorExpander`], which turns a set of base
//! rows into their ranked, deduplicated ancestor rows.
//!
//! Expansion runs in three phases:
//!
//! 1. **Decode** every base row's path into ranked ancestor ids and derive its
//!    tree root. No store access happens here.
//! 2. **Fetch** the union of referenced ids with one bulk call, so the number
//!    of store round trips does not grow with the number of base rows.
//! 3. **Rank** each tree partition: deduplicate on (root, ancestor id), order
//!    root first and assign `rank_from_tip` within the partition.
//!
//! Trees never interact, so phase 3 may run in parallel per tree.

use std::collections::{BTreeSet, HashMap, HashSet};

use ancestry_path::{decode, root_id, try_decode, DecodedAncestor};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ExecutorConfig;
use crate::error::JoinResult;
use crate::rank::RankingMode;
use crate::result::RankedRow;
use crate::traits::{AncestryNode, NodeIdOf, NodeStore};

/// Output of one expansion, before rank filtering.
#[derive(Debug, Clone)]
pub struct Expansion<N: AncestryNode> {
    /// Ranked rows, grouped by tree and ordered root first.
    pub rows: Vec<RankedRow<N>>,
    /// Number of base rows consumed.
    pub base_rows: usize,
    /// Number of distinct ancestor ids requested from the store.
    pub distinct_ancestors: usize,
    /// Number of bulk fetches issued (0 or 1).
    pub store_fetches: usize,
    /// Referenced ids the store did not return.
    pub dangling_ancestors: usize,
}

/// Candidate rows of a single tree.
struct TreePartition<N: AncestryNode> {
    root_id: N::Id,
    members: Vec<(N, usize)>,
}

impl<N: AncestryNode> TreePartition<N> {
    fn new(root_id: N::Id) -> Self {
        Self {
            root_id,
            members: Vec::new(),
        }
    }

    fn rank(mut self, mode: RankingMode) -> Vec<RankedRow<N>> {
        // Stable: rows at equal depth keep their first-seen order.
        self.members.sort_by_key(|(_, depth)| *depth);

        let depths: Vec<usize> = self.members.iter().map(|(_, depth)| *depth).collect();
        let tips = mode.tip_ranks(&depths);
        let root_id = self.root_id;

        self.members
            .into_iter()
            .zip(tips)
            .map(|((node, rank_from_root), rank_from_tip)| RankedRow {
                node,
                root_id: root_id.clone(),
                rank_from_root,
                rank_from_tip,
            })
            .collect()
    }
}

/// Expands base rows into their ranked ancestor rows.
///
/// The expander is stateless: every call decodes, fetches and ranks from
/// scratch against the store's current contents.
///
/// Ancestor ids that a path references but the store does not return are
/// omitted from the output (inner-join semantics) and counted in
/// [`Expansion::dangling_ancestors`]. They are not an error.
///
/// # Example
///
/// ```ignore
/// use ancestry_joins::AncestorExpander;
///
/// let expander = AncestorExpander::new(&store);
/// let expansion = expander.expand(&base_rows, true)?;
///
/// for row in &expansion.rows {
///     println!("{} rank {} in tree {}", row.id(), row.rank_from_root, row.root_id);
/// }
/// ```
pub struct AncestorExpander<'a, S: NodeStore> {
    store: &'a S,
    ranking: RankingMode,
    parallel: bool,
    strict_paths: bool,
}

impl<'a, S: NodeStore> AncestorExpander<'a, S> {
    /// Creates an expander with dense ranking, sequential execution and
    /// lenient path decoding.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            ranking: RankingMode::default(),
            parallel: false,
            strict_paths: false,
        }
    }

    /// Creates an expander following an executor configuration.
    pub fn from_config(store: &'a S, config: &ExecutorConfig) -> Self {
        Self {
            store,
            ranking: config.ranking,
            parallel: config.parallel,
            strict_paths: config.strict_paths,
        }
    }

    /// Sets the reverse-rank numbering.
    pub fn with_ranking(mut self, ranking: RankingMode) -> Self {
        self.ranking = ranking;
        self
    }

    /// Ranks trees in parallel when the `parallel` feature is enabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rejects malformed paths instead of treating them as empty.
    pub fn with_strict_paths(mut self, strict: bool) -> Self {
        self.strict_paths = strict;
        self
    }

    /// Returns true if parallel ranking was requested.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Expands `base` into ranked ancestor rows.
    ///
    /// # Arguments
    ///
    /// * `base` - The caller's already-filtered rows
    /// * `include_self` - Keep each base row as the deepest entry of its chain
    ///
    /// # Returns
    ///
    /// Rows deduplicated on (root, ancestor id), grouped by tree in order of
    /// first appearance and ordered root first within each tree.
    ///
    /// # Errors
    ///
    /// Store failures, and malformed paths in strict mode.
    pub fn expand<B, T>(&self, base: T, include_self: bool) -> JoinResult<Expansion<S::Node>>
    where
        T: IntoIterator<Item = B>,
        B: AncestryNode<Id = NodeIdOf<S>>,
    {
        let mut base_rows = 0;
        let mut chains = Vec::new();
        for row in base {
            base_rows += 1;
            let chain = self.decode_row(&row, include_self)?;
            // Roots without self contribute nothing.
            if chain.is_empty() {
                continue;
            }
            chains.push((root_id(row.ancestry(), row.id()), chain));
        }

        let ids: Vec<NodeIdOf<S>> = chains
            .iter()
            .flat_map(|(_, chain)| chain.iter().map(|entry| &entry.ancestor_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        let fetched = self.fetch(&ids)?;

        let (partitions, dangling_ancestors) = partition(chains, &fetched);
        let rows = self.rank_all(partitions);

        tracing::debug!(
            base_rows,
            distinct_ancestors = ids.len(),
            dangling_ancestors,
            rows = rows.len(),
            "expanded ancestors"
        );

        Ok(Expansion {
            rows,
            base_rows,
            distinct_ancestors: ids.len(),
            store_fetches: usize::from(!ids.is_empty()),
            dangling_ancestors,
        })
    }

    fn decode_row<B>(
        &self,
        row: &B,
        include_self: bool,
    ) -> JoinResult<Vec<DecodedAncestor<NodeIdOf<S>>>>
    where
        B: AncestryNode<Id = NodeIdOf<S>>,
    {
        if self.strict_paths {
            Ok(try_decode(row.ancestry(), row.id(), include_self)?)
        } else {
            Ok(decode(row.ancestry(), row.id(), include_self))
        }
    }

    /// One bulk lookup for every referenced id; skipped when nothing is referenced.
    fn fetch(&self, ids: &[NodeIdOf<S>]) -> JoinResult<HashMap<NodeIdOf<S>, S::Node>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = self.store.fetch_many(ids)?;
        Ok(rows
            .into_iter()
            .map(|row| (row.id().clone(), row))
            .collect())
    }

    #[cfg(feature = "parallel")]
    fn rank_all(&self, partitions: Vec<TreePartition<S::Node>>) -> Vec<RankedRow<S::Node>> {
        let mode = self.ranking;
        if self.parallel {
            return partitions
                .into_par_iter()
                .map(|tree| tree.rank(mode))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect();
        }
        partitions
            .into_iter()
            .flat_map(|tree| tree.rank(mode))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn rank_all(&self, partitions: Vec<TreePartition<S::Node>>) -> Vec<RankedRow<S::Node>> {
        let mode = self.ranking;
        partitions
            .into_iter()
            .flat_map(|tree| tree.rank(mode))
            .collect()
    }
}

/// Groups decoded chains by tree, joining against fetched rows and dropping
/// duplicates and dangling ids.
fn partition<N: AncestryNode>(
    chains: Vec<(N::Id, Vec<DecodedAncestor<N::Id>>)>,
    fetched: &HashMap<N::Id, N>,
) -> (Vec<TreePartition<N>>, usize)
where
    N: Clone,
{
    let mut partitions: Vec<TreePartition<N>> = Vec::new();
    let mut slots: HashMap<N::Id, usize> = HashMap::new();
    let mut seen: HashSet<(N::Id, N::Id)> = HashSet::new();
    let mut dangling = 0;

    for (root, chain) in chains {
        let slot = match slots.get(&root).copied() {
            Some(slot) => slot,
            None => {
                slots.insert(root.clone(), partitions.len());
                partitions.push(TreePartition::new(root.clone()));
                partitions.len() - 1
            }
        };

        for entry in chain {
            if !seen.insert((root.clone(), entry.ancestor_id.clone())) {
                continue;
            }
            match fetched.get(&entry.ancestor_id) {
                Some(node) => partitions[slot].members.push((node.clone(), entry.position)),
                None => {
                    dangling += 1;
                    tracing::debug!(
                        ancestor = %entry.ancestor_id,
                        root = %root,
                        "ancestor missing from store, omitted"
                    );
                }
            }
        }
    }

    partitions.retain(|tree| !tree.members.is_empty());
    (partitions, dangling)
}
