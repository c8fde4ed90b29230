//! Composable query descriptors.
//!
//! [`AncestorScope`] describes one ancestor expansion (include self, rank
//! bounds). [`AncestryQuery`] pairs a scope with the caller's base filters.
//! Both are plain values: chaining returns a new value and never touches a
//! store, so queries can be built, cloned and inspected without one.
//!
//! # Performance note
//!
//! Put the ancestor expansion last. Base filters run before expansion and
//! shrink the decoded set; filtering the expanded rows afterwards gives the
//! same answer but pays for ancestors that are thrown away.

use std::fmt;
use std::sync::Arc;

use crate::rank::RankFilter;

/// Parameters of one ancestor expansion.
///
/// The three constructors mirror the caller-facing operations:
///
/// | Constructor | include self | nth_reverse |
/// |-------------|--------------|-------------|
/// | [`with_ancestors`](Self::with_ancestors) | yes | - |
/// | [`with_ancestors_only`](Self::with_ancestors_only) | no | - |
/// | [`with_ancestors_leafs_only`](Self::with_ancestors_leafs_only) | yes | 1 |
///
/// ```rust
/// use ancestry_joins::AncestorScope;
///
/// let parent_only = AncestorScope::with_ancestors_only().nth_reverse(1);
/// assert!(!parent_only.include_self);
/// assert_eq!(parent_only.filter.nth_reverse, Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AncestorScope {
    /// Keep the base row itself at the deepest position of its chain.
    pub include_self: bool,
    /// Rank bounds applied after ranking.
    pub filter: RankFilter,
}

impl Default for AncestorScope {
    fn default() -> Self {
        Self {
            include_self: true,
            filter: RankFilter::default(),
        }
    }
}

impl AncestorScope {
    /// Ancestors plus the row itself, unfiltered.
    pub fn with_ancestors() -> Self {
        Self::default()
    }

    /// Ancestors without the row itself.
    pub fn with_ancestors_only() -> Self {
        Self::default().include_self(false)
    }

    /// Only the deepest rows of each tree.
    pub fn with_ancestors_leafs_only() -> Self {
        Self::default().nth_reverse(1)
    }

    /// Sets whether the base row is part of its own chain.
    pub fn include_self(mut self, include_self: bool) -> Self {
        self.include_self = include_self;
        self
    }

    /// Keeps only rows at this rank from the root.
    pub fn nth(mut self, nth: usize) -> Self {
        self.filter = self.filter.nth(nth);
        self
    }

    /// Keeps only rows at this rank from the tip.
    pub fn nth_reverse(mut self, nth_reverse: usize) -> Self {
        self.filter = self.filter.nth_reverse(nth_reverse);
        self
    }
}

/// Shared base-row predicate.
pub type NodePredicate<N> = Arc<dyn Fn(&N) -> bool + Send + Sync>;

/// Base filters plus an ancestor scope, executed by
/// [`AncestryExecutor::run`](crate::AncestryExecutor::run).
///
/// Base predicates combine with AND, so the order they are added in does not
/// matter.
///
/// ```rust
/// use ancestry_joins::{AncestryQuery, Node};
///
/// let query = AncestryQuery::<Node<i64, &str>>::with_ancestors_only()
///     .where_node(|node| node.attrs.starts_with('a'))
///     .nth(1);
///
/// assert_eq!(query.predicate_count(), 1);
/// assert_eq!(query.scope().filter.nth, Some(1));
/// ```
pub struct AncestryQuery<N> {
    predicates: Vec<NodePredicate<N>>,
    scope: AncestorScope,
}

impl<N> AncestryQuery<N> {
    /// Creates a query over the whole store with the given scope.
    pub fn new(scope: AncestorScope) -> Self {
        Self {
            predicates: Vec::new(),
            scope,
        }
    }

    /// See [`AncestorScope::with_ancestors`].
    pub fn with_ancestors() -> Self {
        Self::new(AncestorScope::with_ancestors())
    }

    /// See [`AncestorScope::with_ancestors_only`].
    pub fn with_ancestors_only() -> Self {
        Self::new(AncestorScope::with_ancestors_only())
    }

    /// See [`AncestorScope::with_ancestors_leafs_only`].
    pub fn with_ancestors_leafs_only() -> Self {
        Self::new(AncestorScope::with_ancestors_leafs_only())
    }

    /// Adds a base-row predicate.
    pub fn where_node<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Replaces the scope.
    pub fn scope_with(mut self, scope: AncestorScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets whether base rows are kept in their own chain.
    pub fn include_self(mut self, include_self: bool) -> Self {
        self.scope = self.scope.include_self(include_self);
        self
    }

    /// Keeps only rows at this rank from the root.
    pub fn nth(mut self, nth: usize) -> Self {
        self.scope = self.scope.nth(nth);
        self
    }

    /// Keeps only rows at this rank from the tip.
    pub fn nth_reverse(mut self, nth_reverse: usize) -> Self {
        self.scope = self.scope.nth_reverse(nth_reverse);
        self
    }

    /// Returns the expansion scope.
    pub fn scope(&self) -> AncestorScope {
        self.scope
    }

    /// Returns the number of base predicates.
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Returns true if the query narrows the base set.
    pub fn has_base_filter(&self) -> bool {
        !self.predicates.is_empty()
    }

    /// Checks a row against every base predicate.
    pub fn matches_base(&self, node: &N) -> bool {
        self.predicates.iter().all(|predicate| predicate(node))
    }
}

impl<N> Clone for AncestryQuery<N> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            scope: self.scope,
        }
    }
}

impl<N> fmt::Debug for AncestryQuery<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AncestryQuery")
            .field("predicates", &self.predicates.len())
            .field("scope", &self.scope)
            .finish()
    }
}
