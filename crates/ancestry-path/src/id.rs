//! Identifier bound shared by every ancestry component.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// A node identifier that can appear inside an ancestry path.
///
/// Identifiers are written into paths with [`Display`] and read back with
/// [`FromStr`]. They must be hashable (deduplication, batched lookups) and
/// ordered (stable grouping by root).
///
/// Blanket-implemented for every type meeting the bounds, so `i64`, `u64`,
/// `String` and most newtype ids work out of the box.
pub trait NodeId:
    Clone + Eq + Hash + Ord + Debug + Display + FromStr + Send + Sync + 'static
{
}

impl<T> NodeId for T where
    T: Clone + Eq + Hash + Ord + Debug + Display + FromStr + Send + Sync + 'static
{
}
