//! Ancestry executor implementation.

use std::time::Instant;

use crate::config::ExecutorConfig;
use crate::error::{JoinError, JoinResult};
use crate::expander::AncestorExpander;
use crate::result::{ExecutionStats, RankedRows};
use crate::scope::{AncestorScope, AncestryQuery};
use crate::traits::{AncestryNode, NodeIdOf, NodeStore};

/// Main entry point for ancestor queries.
///
/// The executor pairs a [`NodeStore`] with an [`ExecutorConfig`] and exposes
/// the caller-facing operations:
///
/// | Operation | Equivalent scope |
/// |-----------|------------------|
/// | [`with_ancestors`](Self::with_ancestors) | as given |
/// | [`with_ancestors_only`](Self::with_ancestors_only) | `include_self = false` |
/// | [`with_ancestors_leafs_only`](Self::with_ancestors_leafs_only) | `nth_reverse = 1` |
///
/// Each takes the caller's already-narrowed base rows and returns a
/// [`RankedRows`] that can be filtered, sorted or expanded again.
///
/// # Example
///
/// ```ignore
/// use ancestry_joins::{AncestorScope, AncestryExecutor};
///
/// let executor = AncestryExecutor::new(&store);
///
/// // Parents of every matching row, without the rows themselves
/// let base = store.select(&|item| item.attrs.starts_with("a"))?;
/// let parents = executor.with_ancestors_only(&base, AncestorScope::default())?;
///
/// // Tips of every tree in the store
/// let tips = executor.run(&AncestryQuery::with_ancestors_leafs_only())?;
/// ```
pub struct AncestryExecutor<'a, S: NodeStore> {
    /// Reference to the node store.
    store: &'a S,
    /// Executor configuration.
    config: ExecutorConfig,
}

impl<'a, S: NodeStore> AncestryExecutor<'a, S> {
    /// Creates a new executor with default configuration.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: ExecutorConfig::default(),
        }
    }

    /// Creates an executor with custom configuration.
    pub fn with_config(store: &'a S, config: ExecutorConfig) -> Self {
        Self { store, config }
    }

    /// Returns a reference to the executor configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &'a S {
        self.store
    }

    /// Runs a query: selects base rows from the store, then expands them.
    ///
    /// A query without base predicates expands the whole store.
    pub fn run(&self, query: &AncestryQuery<S::Node>) -> JoinResult<RankedRows<S::Node>> {
        let base = if query.has_base_filter() {
            self.store.select(&|node: &S::Node| query.matches_base(node))?
        } else {
            self.store.scan()?
        };
        self.expand(&base, query.scope())
    }

    /// Expands caller-supplied base rows with the given scope.
    ///
    /// # Arguments
    ///
    /// * `base` - Rows already narrowed by the caller; any [`AncestryNode`]
    ///   with the store's id type, including a previous result's rows
    /// * `scope` - Include-self flag and rank bounds
    ///
    /// # Returns
    ///
    /// * `Ok(RankedRows)` - Ranked rows and execution stats
    /// * `Err(JoinError)` - Store failure, strict path rejection, or more rows
    ///   than `max_results`
    pub fn expand<B, T>(&self, base: T, scope: AncestorScope) -> JoinResult<RankedRows<S::Node>>
    where
        T: IntoIterator<Item = B>,
        B: AncestryNode<Id = NodeIdOf<S>>,
    {
        let start = Instant::now();

        let expansion = AncestorExpander::from_config(self.store, &self.config)
            .expand(base, scope.include_self)?;
        let rows = scope.filter.apply(expansion.rows);

        if let Some(limit) = self.config.max_results {
            if rows.len() > limit {
                tracing::warn!(count = rows.len(), limit, "ancestor result exceeds limit");
                return Err(JoinError::ResultTooLarge {
                    count: rows.len(),
                    limit,
                });
            }
        }

        let stats = ExecutionStats {
            duration: start.elapsed(),
            base_rows: expansion.base_rows,
            distinct_ancestors: expansion.distinct_ancestors,
            store_fetches: expansion.store_fetches,
            dangling_ancestors: expansion.dangling_ancestors,
            rows_emitted: rows.len(),
        };
        tracing::debug!(
            rows = stats.rows_emitted,
            include_self = scope.include_self,
            nth = ?scope.filter.nth,
            nth_reverse = ?scope.filter.nth_reverse,
            duration_us = stats.duration_micros(),
            "ancestor query finished"
        );

        Ok(RankedRows::new(rows, stats))
    }

    /// Ancestors of every base row, honoring `scope` as given.
    pub fn with_ancestors<B, T>(
        &self,
        base: T,
        scope: AncestorScope,
    ) -> JoinResult<RankedRows<S::Node>>
    where
        T: IntoIterator<Item = B>,
        B: AncestryNode<Id = NodeIdOf<S>>,
    {
        self.expand(base, scope)
    }

    /// Ancestors of every base row, never the base row itself.
    pub fn with_ancestors_only<B, T>(
        &self,
        base: T,
        scope: AncestorScope,
    ) -> JoinResult<RankedRows<S::Node>>
    where
        T: IntoIterator<Item = B>,
        B: AncestryNode<Id = NodeIdOf<S>>,
    {
        self.expand(base, scope.include_self(false))
    }

    /// Only the deepest rows of each tree among the expanded candidates.
    ///
    /// Deepest relative to this query: a global leaf is only guaranteed when
    /// the base set covers its whole tree.
    pub fn with_ancestors_leafs_only<B, T>(
        &self,
        base: T,
        scope: AncestorScope,
    ) -> JoinResult<RankedRows<S::Node>>
    where
        T: IntoIterator<Item = B>,
        B: AncestryNode<Id = NodeIdOf<S>>,
    {
        self.expand(base, scope.nth_reverse(1))
    }
}
