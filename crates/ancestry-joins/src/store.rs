//! In-memory node store.
//!
//! [`MemoryStore`] keeps rows in insertion order with an id index, which is
//! enough to run expansions in-process, in tests, or against a snapshot
//! loaded from elsewhere.

use std::collections::HashMap;

use ancestry_path::{child_path, NodeId};

use crate::error::JoinResult;
use crate::traits::{AncestryNode, NodeIdOf, NodeStore};

/// A generic ancestry row: id, path, and opaque attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<I, A = ()> {
    /// Primary key.
    pub id: I,
    /// Ancestry path, root first; `None` for a forest root.
    pub ancestry: Option<String>,
    /// Caller-owned columns, passed through untouched.
    pub attrs: A,
}

impl<I: NodeId, A> Node<I, A> {
    /// Creates a node with an explicit path.
    pub fn new(id: I, ancestry: Option<String>, attrs: A) -> Self {
        Self {
            id,
            ancestry,
            attrs,
        }
    }

    /// Creates a forest root.
    pub fn root(id: I, attrs: A) -> Self {
        Self::new(id, None, attrs)
    }

    /// Creates a child of `parent`, deriving its path from the parent's.
    pub fn child_of<B>(id: I, parent: &Node<I, B>, attrs: A) -> Self {
        let path = child_path(parent.ancestry.as_deref(), &parent.id);
        Self::new(id, Some(path), attrs)
    }
}

impl<I: NodeId, A> AncestryNode for Node<I, A> {
    type Id = I;

    fn id(&self) -> &I {
        &self.id
    }

    fn ancestry(&self) -> Option<&str> {
        self.ancestry.as_deref()
    }
}

/// Id-indexed rows held in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore<N: AncestryNode> {
    rows: Vec<N>,
    index: HashMap<N::Id, usize>,
}

impl<N: AncestryNode> Default for MemoryStore<N> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<N: AncestryNode> MemoryStore<N> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from rows; later rows replace earlier ones with the same id.
    pub fn from_nodes<T: IntoIterator<Item = N>>(nodes: T) -> Self {
        let mut store = Self::new();
        for node in nodes {
            store.insert(node);
        }
        store
    }

    /// Inserts or replaces a row.
    pub fn insert(&mut self, node: N) {
        if let Some(&slot) = self.index.get(node.id()) {
            self.rows[slot] = node;
            return;
        }
        self.index.insert(node.id().clone(), self.rows.len());
        self.rows.push(node);
    }

    /// Looks up a row by id.
    pub fn get(&self, id: &N::Id) -> Option<&N> {
        self.index.get(id).map(|&slot| &self.rows[slot])
    }

    /// Returns the rows in insertion order.
    pub fn rows(&self) -> &[N] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<N> NodeStore for MemoryStore<N>
where
    N: AncestryNode + Clone + Send + Sync,
{
    type Node = N;

    fn fetch_many(&self, ids: &[NodeIdOf<Self>]) -> JoinResult<Vec<N>> {
        Ok(ids.iter().filter_map(|id| self.get(id).cloned()).collect())
    }

    fn scan(&self) -> JoinResult<Vec<N>> {
        Ok(self.rows.clone())
    }

    fn select(&self, predicate: &dyn Fn(&N) -> bool) -> JoinResult<Vec<N>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }
}
