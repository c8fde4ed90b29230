//! # ancestry-path
//!
//! Decoding of materialized-path ancestry strings.
//!
//! A tree stored with the materialized-path pattern keeps, on every row, the
//! ids of all its ancestors from the forest root down to its parent, joined by
//! `/`. A root row has an empty (or absent) path.
//!
//! This crate provides:
//! - **Path Decoder**: [`decode`] turns a path into ranked ancestor entries
//! - **Root Identifier Extractor**: [`root_id`] derives the tree-grouping key
//! - **Strict audit**: [`try_decode`] reports malformed or inconsistent paths
//! - **Encoding**: [`encode`] and [`child_path`] write paths in the same shape
//!
//! ## Usage
//!
//! ```rust
//! use ancestry_path::{decode, root_id};
//!
//! // Row 3 whose parent is 2, whose parent is the root 1
//! let path = Some("1/2");
//!
//! let chain = decode(path, &3_i64, true);
//! assert_eq!(chain.len(), 3);
//! assert_eq!(chain[0].ancestor_id, 1);
//! assert_eq!(chain[0].position, 1);
//!
//! assert_eq!(root_id(path, &3_i64), 1);
//! ```
//!
//! ## Path Quick Reference
//!
//! | Path | Meaning | Ancestors (root first) |
//! |------|---------|------------------------|
//! | *(absent)* or `""` | forest root | none |
//! | `"1"` | child of root 1 | `1` |
//! | `"1/2/3"` | great-grandchild of 1 | `1`, `2`, `3` |
//! | `"1//2/"` | tolerated, empty segments dropped | `1`, `2` |
//! | `"1/x"` (integer ids) | undecodable | none |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod decode;
mod encode;
mod error;
mod id;
mod parser;
mod root;

pub use decode::{decode, try_decode, DecodedAncestor};
pub use encode::{child_path, encode};
pub use error::{PathError, PathResult};
pub use id::NodeId;
pub use root::{depth, parent_id, root_id};

/// Separator between ids in an ancestry path.
pub const DELIMITER: char = '/';
