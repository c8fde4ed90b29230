//! Root and parent extraction from ancestry paths.

use crate::id::NodeId;
use crate::parser::parse_ids;

/// Returns the forest root of a row: the first segment of its path, or the
/// row's own id when the path is empty.
///
/// A path that does not decode is treated like an empty one, so the row is
/// its own root. This keeps the grouping key consistent with
/// [`decode`](crate::decode). The root is not checked for existence.
///
/// ```rust
/// use ancestry_path::root_id;
///
/// assert_eq!(root_id(Some("5/9"), &12_i64), 5);
/// assert_eq!(root_id(None, &12_i64), 12);
/// assert_eq!(root_id(Some("/"), &12_i64), 12);
/// ```
pub fn root_id<I: NodeId>(path: Option<&str>, self_id: &I) -> I {
    parse_ids::<I>(path)
        .ok()
        .and_then(|ids| ids.into_iter().next())
        .unwrap_or_else(|| self_id.clone())
}

/// Returns the immediate parent encoded in a path (its last segment).
///
/// `None` for roots and for undecodable paths.
pub fn parent_id<I: NodeId>(path: Option<&str>) -> Option<I> {
    parse_ids::<I>(path).ok().and_then(|ids| ids.into_iter().last())
}

/// Returns the number of ancestors encoded in a path.
///
/// Zero for roots and for undecodable paths, matching [`decode`](crate::decode).
pub fn depth<I: NodeId>(path: Option<&str>) -> usize {
    parse_ids::<I>(path).map_or(0, |ids| ids.len())
}
