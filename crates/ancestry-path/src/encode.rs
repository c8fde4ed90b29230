//! Path encoding, the inverse of decoding.
//!
//! Writing paths belongs to whatever maintains the tree; these helpers only
//! produce strings in the same shape so fixtures and in-memory stores agree
//! with the decoder.

use std::fmt::Display;

use crate::parser::segments;
use crate::DELIMITER;

/// Joins ancestor ids, root first, into a path string.
///
/// ```rust
/// use ancestry_path::encode;
///
/// assert_eq!(encode([1, 2, 3]), "1/2/3");
/// assert_eq!(encode(Vec::<i64>::new()), "");
/// ```
pub fn encode<I, T>(ids: T) -> String
where
    I: Display,
    T: IntoIterator<Item = I>,
{
    let delimiter = DELIMITER.to_string();
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(delimiter.as_str())
}

/// Builds the path of a new child from its parent's path and id.
///
/// The parent's path is normalized (empty segments dropped) before the
/// parent id is appended.
pub fn child_path<I: Display>(parent_path: Option<&str>, parent_id: &I) -> String {
    let mut parts: Vec<String> = parent_path
        .map(|path| segments(path).into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    parts.push(parent_id.to_string());
    encode(parts)
}
