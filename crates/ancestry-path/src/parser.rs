//! Segment parser for ancestry strings, implemented with nom.

use nom::{
    bytes::complete::take_till, character::complete::char, combinator::all_consuming,
    multi::separated_list0, IResult,
};

use crate::error::{PathError, PathResult};
use crate::DELIMITER;

/// Splits on the delimiter, keeping empty segments.
fn raw_segments(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(char(DELIMITER), take_till(|c: char| c == DELIMITER))(input)
}

/// Returns the trimmed, non-empty segments of a path.
///
/// `"1//2/ 3 /"` yields `["1", "2", "3"]`. The grammar accepts every input,
/// so a parse failure can only mean an empty result.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    match all_consuming(raw_segments)(path) {
        Ok((_, raw)) => raw
            .into_iter()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Parses every segment of `path` as an identifier, root first.
///
/// An absent or blank path yields an empty Vec.
pub(crate) fn parse_ids<I: std::str::FromStr>(path: Option<&str>) -> PathResult<Vec<I>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    segments(path)
        .into_iter()
        .enumerate()
        .map(|(idx, segment)| {
            segment.parse::<I>().map_err(|_| PathError::InvalidSegment {
                segment: segment.to_string(),
                position: idx + 1,
            })
        })
        .collect()
}
