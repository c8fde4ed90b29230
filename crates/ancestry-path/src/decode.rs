//! Path decoding: ancestry string to ordered ancestor entries.

use std::collections::HashSet;

use crate::error::{PathError, PathResult};
use crate::id::NodeId;
use crate::parser::parse_ids;

/// One decoded ancestor of a row.
///
/// `position` is the 1-based rank from the forest root. When the row itself is
/// included it sits at the maximal position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedAncestor<I> {
    /// Identifier of the ancestor node.
    pub ancestor_id: I,
    /// 1-based rank from the root.
    pub position: usize,
}

impl<I> DecodedAncestor<I> {
    /// Creates a decoded entry.
    pub fn new(ancestor_id: I, position: usize) -> Self {
        Self {
            ancestor_id,
            position,
        }
    }
}

/// Decodes an ancestry path into ancestor entries, root first.
///
/// Never fails. An absent, blank or undecodable path is treated as
/// "zero ancestors"; with `include_self = false` such a row contributes
/// nothing.
///
/// # Example
///
/// ```rust
/// use ancestry_path::decode;
///
/// let chain = decode(Some("1/2"), &3_i64, true);
/// let ids: Vec<i64> = chain.iter().map(|a| a.ancestor_id).collect();
/// assert_eq!(ids, vec![1, 2, 3]);
/// assert_eq!(chain[2].position, 3);
///
/// assert!(decode::<i64>(None, &1, false).is_empty());
/// ```
pub fn decode<I: NodeId>(
    path: Option<&str>,
    self_id: &I,
    include_self: bool,
) -> Vec<DecodedAncestor<I>> {
    let ids = parse_ids::<I>(path).unwrap_or_else(|err| {
        tracing::debug!(node = %self_id, error = %err, "undecodable ancestry treated as empty");
        Vec::new()
    });
    number(ids, self_id, include_self)
}

/// Strict variant of [`decode`] that audits the path.
///
/// Fails on segments that do not parse as `I`, on duplicated ancestors and on
/// paths that list the row's own id.
pub fn try_decode<I: NodeId>(
    path: Option<&str>,
    self_id: &I,
    include_self: bool,
) -> PathResult<Vec<DecodedAncestor<I>>> {
    let ids = parse_ids::<I>(path)?;

    let mut seen = HashSet::with_capacity(ids.len());
    for id in &ids {
        if id == self_id {
            return Err(PathError::SelfReference(self_id.to_string()));
        }
        if !seen.insert(id) {
            return Err(PathError::DuplicateAncestor(id.to_string()));
        }
    }

    Ok(number(ids, self_id, include_self))
}

fn number<I: NodeId>(mut ids: Vec<I>, self_id: &I, include_self: bool) -> Vec<DecodedAncestor<I>> {
    if include_self {
        ids.push(self_id.clone());
    }
    ids.into_iter()
        .enumerate()
        .map(|(idx, id)| DecodedAncestor::new(id, idx + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[DecodedAncestor<i64>]) -> Vec<i64> {
        entries.iter().map(|e| e.ancestor_id).collect()
    }

    fn positions(entries: &[DecodedAncestor<i64>]) -> Vec<usize> {
        entries.iter().map(|e| e.position).collect()
    }

    #[test]
    fn test_decode_root_with_self() {
        let result = decode(None, &1_i64, true);
        assert_eq!(ids(&result), vec![1]);
        assert_eq!(positions(&result), vec![1]);
    }

    #[test]
    fn test_decode_root_without_self() {
        assert!(decode(None, &1_i64, false).is_empty());
        assert!(decode(Some(""), &1_i64, false).is_empty());
        assert!(decode(Some("  "), &1_i64, false).is_empty());
    }

    #[test]
    fn test_decode_single_ancestor() {
        let result = decode(Some("1"), &2_i64, false);
        assert_eq!(ids(&result), vec![1]);
        assert_eq!(positions(&result), vec![1]);
    }

    #[test]
    fn test_decode_chain_with_self() {
        let result = decode(Some("1/2/3"), &4_i64, true);
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
        assert_eq!(positions(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_skips_empty_segments() {
        let result = decode(Some("/1//2/"), &3_i64, false);
        assert_eq!(ids(&result), vec![1, 2]);
        assert_eq!(positions(&result), vec![1, 2]);
    }

    #[test]
    fn test_decode_garbage_is_zero_ancestors() {
        assert!(decode(Some("1/oops/3"), &4_i64, false).is_empty());

        let with_self = decode(Some("1/oops/3"), &4_i64, true);
        assert_eq!(ids(&with_self), vec![4]);
        assert_eq!(positions(&with_self), vec![1]);
    }

    #[test]
    fn test_decode_string_ids() {
        let result = decode(Some("a/b"), &"c".to_string(), true);
        let got: Vec<&str> = result.iter().map(|e| e.ancestor_id.as_str()).collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_try_decode_ok() {
        let result = try_decode(Some("1/2"), &3_i64, false).unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_try_decode_invalid_segment() {
        let err = try_decode(Some("1/x"), &3_i64, false).unwrap_err();
        assert!(matches!(err, PathError::InvalidSegment { position: 2, .. }));
    }

    #[test]
    fn test_try_decode_duplicate() {
        let err = try_decode(Some("1/2/1"), &3_i64, false).unwrap_err();
        assert_eq!(err, PathError::DuplicateAncestor("1".to_string()));
    }

    #[test]
    fn test_try_decode_self_reference() {
        let err = try_decode(Some("1/3"), &3_i64, true).unwrap_err();
        assert_eq!(err, PathError::SelfReference("3".to_string()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decoded_ancestor_serializes() {
        let entry = DecodedAncestor::new(7_i64, 2);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"ancestor_id":7,"position":2}"#);
    }
}
