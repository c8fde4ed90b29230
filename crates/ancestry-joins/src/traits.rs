//! Traits for ancestor expansion.
//!
//! This module defines the two seams between the expander and the caller's
//! storage:
//!
//! - [`AncestryNode`]: anything carrying an id and an ancestry path
//! - [`NodeStore`]: the table those nodes live in, able to scan and to fetch
//!   many rows by id in one call
//!
//! # Example: Implementing NodeStore for an existing table
//!
//! ```ignore
//! use ancestry_joins::{AncestryNode, JoinError, JoinResult, NodeStore};
//!
//! impl AncestryNode for ItemRow {
//!     type Id = i64;
//!
//!     fn id(&self) -> &i64 {
//!         &self.id
//!     }
//!
//!     fn ancestry(&self) -> Option<&str> {
//!         self.ancestry.as_deref()
//!     }
//! }
//!
//! impl NodeStore for ItemTable {
//!     type Node = ItemRow;
//!
//!     fn fetch_many(&self, ids: &[i64]) -> JoinResult<Vec<ItemRow>> {
//!         self.load_where_id_in(ids)
//!             .map_err(|e| JoinError::Store(e.to_string()))
//!     }
//!
//!     fn scan(&self) -> JoinResult<Vec<ItemRow>> {
//!         self.load_all().map_err(|e| JoinError::Store(e.to_string()))
//!     }
//! }
//! ```

use ancestry_path::NodeId;

use crate::error::JoinResult;

/// A row that knows its own id and materialized ancestry path.
///
/// All other attributes are opaque to the expander and travel through
/// untouched.
pub trait AncestryNode {
    /// Identifier type of the node.
    type Id: NodeId;

    /// The node's primary key.
    fn id(&self) -> &Self::Id;

    /// The ancestry path, root first, or `None` for a forest root.
    fn ancestry(&self) -> Option<&str>;
}

impl<T: AncestryNode + ?Sized> AncestryNode for &T {
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }

    fn ancestry(&self) -> Option<&str> {
        (**self).ancestry()
    }
}

/// Identifier type of a store's nodes.
pub type NodeIdOf<S> = <<S as NodeStore>::Node as AncestryNode>::Id;

/// Trait for stores holding ancestry nodes.
///
/// The store owns the schema and the ancestry invariants; the expander only
/// reads from it.
///
/// # Required Methods
///
/// - [`fetch_many`](Self::fetch_many) - Bulk lookup by id
/// - [`scan`](Self::scan) - Every row, used as the base set when the caller
///   applies no filter
pub trait NodeStore: Send + Sync {
    /// Row type stored in this store.
    type Node: AncestryNode + Clone + Send + Sync;

    /// Fetches all rows whose id is in `ids`, in any order.
    ///
    /// Ids with no row are silently absent from the output. The expander
    /// calls this at most once per expansion, with distinct ids.
    fn fetch_many(&self, ids: &[NodeIdOf<Self>]) -> JoinResult<Vec<Self::Node>>;

    /// Returns every row in the store.
    fn scan(&self) -> JoinResult<Vec<Self::Node>>;

    /// Returns the rows matching `predicate`.
    ///
    /// The default filters [`scan`](Self::scan); stores that can push the
    /// predicate down should override it.
    fn select(&self, predicate: &dyn Fn(&Self::Node) -> bool) -> JoinResult<Vec<Self::Node>> {
        let mut rows = self.scan()?;
        rows.retain(|row| predicate(row));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    struct Row {
        id: u64,
        ancestry: Option<String>,
    }

    impl AncestryNode for Row {
        type Id = u64;

        fn id(&self) -> &u64 {
            &self.id
        }

        fn ancestry(&self) -> Option<&str> {
            self.ancestry.as_deref()
        }
    }

    /// Mock store for testing the NodeStore trait.
    struct MockStore {
        rows: HashMap<u64, Row>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                rows: HashMap::new(),
            }
        }

        fn add(&mut self, id: u64, ancestry: Option<&str>) {
            self.rows.insert(
                id,
                Row {
                    id,
                    ancestry: ancestry.map(str::to_string),
                },
            );
        }
    }

    impl NodeStore for MockStore {
        type Node = Row;

        fn fetch_many(&self, ids: &[u64]) -> JoinResult<Vec<Row>> {
            Ok(ids.iter().filter_map(|id| self.rows.get(id).cloned()).collect())
        }

        fn scan(&self) -> JoinResult<Vec<Row>> {
            Ok(self.rows.values().cloned().collect())
        }
    }

    #[test]
    fn test_fetch_many_skips_missing() {
        let mut store = MockStore::new();
        store.add(1, None);
        store.add(2, Some("1"));

        let mut rows = store.fetch_many(&[1, 2, 99]).unwrap();
        rows.sort_by_key(|r| r.id);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].id, 2);
    }

    #[test]
    fn test_default_select_filters_scan() {
        let mut store = MockStore::new();
        store.add(1, None);
        store.add(2, Some("1"));
        store.add(3, Some("1/2"));

        let roots = store.select(&|row: &Row| row.ancestry().is_none()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, 1);
    }

    #[test]
    fn test_reference_is_node() {
        let row = Row {
            id: 5,
            ancestry: Some("1/2".to_string()),
        };
        let by_ref: &Row = &row;
        assert_eq!(*AncestryNode::id(&by_ref), 5);
        assert_eq!(AncestryNode::ancestry(&by_ref), Some("1/2"));
    }
}
