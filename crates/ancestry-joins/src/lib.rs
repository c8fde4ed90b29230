//! # ancestry-joins
//!
//! Ranked ancestor expansion for trees stored as materialized paths.
//!
//! Given a set of rows already narrowed by the caller, this crate returns
//! every ancestor of those rows (optionally including the rows themselves),
//! deduplicated per tree and annotated with two ranks:
//!
//! - `rank_from_root`: 1 for the forest root, increasing toward the leaves
//! - `rank_from_tip`: 1 for the deepest rows of each tree in the result
//!
//! Both ranks can be filtered on, which yields the caller-facing operations
//! `with_ancestors`, `with_ancestors_only` and `with_ancestors_leafs_only`.
//!
//! ## Quick Start
//!
//! ```rust
//! use ancestry_joins::{AncestorScope, AncestryExecutor, MemoryStore, Node, NodeStore};
//!
//! let a1 = Node::root(1_i64, "a1");
//! let a2 = Node::child_of(2, &a1, "a2");
//! let a3 = Node::child_of(3, &a2, "a3");
//! let store = MemoryStore::from_nodes([a1, a2, a3]);
//!
//! let executor = AncestryExecutor::new(&store);
//! let base = store.select(&|n: &Node<i64, &str>| n.attrs == "a3").unwrap();
//!
//! // Immediate parent of a3
//! let parent = executor
//!     .with_ancestors_only(&base, AncestorScope::default().nth_reverse(1))
//!     .unwrap();
//! assert_eq!(parent.ids(), vec![&2]);
//!
//! // Root of a3's tree
//! let root = executor
//!     .with_ancestors(&base, AncestorScope::default().nth(1))
//!     .unwrap();
//! assert_eq!(root.ids(), vec![&1]);
//! ```
//!
//! ## With Configuration
//!
//! ```rust
//! use ancestry_joins::{AncestryExecutor, ExecutorConfig, MemoryStore, Node, RankingMode};
//!
//! let store: MemoryStore<Node<i64>> = MemoryStore::new();
//! let config = ExecutorConfig::builder()
//!     .with_ranking(RankingMode::Standard)
//!     .with_max_results(100_000)
//!     .with_strict_paths(true)
//!     .build();
//!
//! let executor = AncestryExecutor::with_config(&store, config);
//! assert!(executor.config().strict_paths);
//! ```
//!
//! ## Operations
//!
//! | Operation | Include self | Rank filter |
//! |-----------|--------------|-------------|
//! | `with_ancestors` | configurable (default yes) | `nth`, `nth_reverse` |
//! | `with_ancestors_only` | no | `nth`, `nth_reverse` |
//! | `with_ancestors_leafs_only` | configurable (default yes) | `nth_reverse = 1` |
//!
//! ## Feature Flags
//!
//! - `parallel` - Ranks independent trees in parallel using rayon
//! - `serde` - Serialize/Deserialize for scopes, configs and result rows
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ancestry-joins                          │
//! │                                                              │
//! │  AncestryExecutor                                            │
//! │  ├── select base rows (AncestryQuery predicates)             │
//! │  ├── AncestorExpander                                        │
//! │  │   ├── decode paths, derive root ids (ancestry-path)       │
//! │  │   ├── one bulk fetch (via NodeStore trait)                │
//! │  │   └── dedup + rank per tree                               │
//! │  ├── apply RankFilter (nth / nth_reverse)                    │
//! │  └── return RankedRows with stats                            │
//! │                                                              │
//! │  Dependencies:                                               │
//! │  └── ancestry-path - path decoding and root extraction       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod executor;
mod expander;
mod rank;
mod result;
mod scope;
mod store;
mod traits;

// Public re-exports
pub use config::{ExecutorConfig, ExecutorConfigBuilder};
pub use error::{JoinError, JoinResult};
pub use executor::AncestryExecutor;
pub use expander::{AncestorExpander, Expansion};
pub use rank::{RankFilter, RankingMode};
pub use result::{ExecutionStats, RankedRow, RankedRows};
pub use scope::{AncestorScope, AncestryQuery, NodePredicate};
pub use store::{MemoryStore, Node};
pub use traits::{AncestryNode, NodeIdOf, NodeStore};

// Re-export commonly used path types for convenience
pub use ancestry_path::{decode, root_id, DecodedAncestor, NodeId, PathError};
