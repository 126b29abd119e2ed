//! Integer list parsing.
//!
//! Lists are comma-separated tokens, each either a single integer or an
//! inclusive `start:end` range, e.g. `1,2,4:6` yields `[1, 2, 4, 5, 6]`.
//! Ranges may descend (`3:1` yields `[3, 2, 1]`).
//!
//! Boolean strings follow the conventional spellings accepted by
//! [`parse_bool`].

use std::num::ParseIntError;

use thiserror::Error;

/// Failure parsing an integer list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A single-value token is not an integer.
    #[error("value at index {index} is not a number: {source}")]
    NotANumber {
        /// Zero-based position of the offending token.
        index: usize,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A range token is malformed.
    #[error("range at index {index} not valid: {token:?}")]
    InvalidRange {
        /// Zero-based position of the offending token.
        index: usize,
        /// The raw token.
        token: String,
    },

    /// The list expands to more than [`MAX_LIST_LEN`] values.
    #[error("list at index {index} expands past {limit} values")]
    TooLong {
        /// Zero-based position of the token that crossed the limit.
        index: usize,
        /// The limit that was exceeded.
        limit: usize,
    },
}

/// Most values a single integer list may expand to.
pub const MAX_LIST_LEN: usize = 1 << 20;

impl ParseError {
    /// Position of the offending token.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::NotANumber { index, .. }
            | Self::InvalidRange { index, .. }
            | Self::TooLong { index, .. } => *index,
        }
    }
}

/// Parse a comma-separated list of integers and ranges.
///
/// Whitespace around tokens is ignored. An empty string yields an empty list.
///
/// # Errors
///
/// Returns [`ParseError`] naming the index of the first malformed token,
/// or [`ParseError::TooLong`] once the list would hold more than
/// [`MAX_LIST_LEN`] values.
///
/// # Examples
///
/// ```
/// use cliutil::parse_int_slice;
/// assert_eq!(parse_int_slice("1,2:4").unwrap(), vec![1, 2, 3, 4]);
/// assert!(parse_int_slice("1,2,three").is_err());
/// ```
pub fn parse_int_slice(s: &str) -> Result<Vec<i64>, ParseError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for (index, token) in s.split(',').enumerate() {
        let room = MAX_LIST_LEN.saturating_sub(out.len());
        out.extend(parse_token(token, index, room)?);
    }
    Ok(out)
}

fn parse_token(token: &str, index: usize, room: usize) -> Result<Vec<i64>, ParseError> {
    let too_long = ParseError::TooLong {
        index,
        limit: MAX_LIST_LEN,
    };
    let bounds: Vec<&str> = token.split(':').collect();
    match bounds.as_slice() {
        [_] if room == 0 => Err(too_long),
        [single] => single
            .trim()
            .parse()
            .map(|value| vec![value])
            .map_err(|source| ParseError::NotANumber { index, source }),
        [start, end] => {
            let invalid = || ParseError::InvalidRange {
                index,
                token: token.to_owned(),
            };
            let first: i64 = start.trim().parse().map_err(|_| invalid())?;
            let last: i64 = end.trim().parse().map_err(|_| invalid())?;
            let span = first.abs_diff(last);
            if usize::try_from(span).ok().is_none_or(|len| len >= room) {
                return Err(too_long);
            }
            Ok(sequence(first, last))
        }
        _ => Err(ParseError::InvalidRange {
            index,
            token: token.to_owned(),
        }),
    }
}

/// Inclusive run of integers from `start` to `end`, ascending or descending.
///
/// Allocates every value of the run; callers parsing untrusted input go
/// through [`parse_int_slice`], which bounds the length.
///
/// # Examples
///
/// ```
/// use cliutil::sequence;
/// assert_eq!(sequence(3, 1), vec![3, 2, 1]);
/// assert_eq!(sequence(2, 2), vec![2]);
/// ```
#[must_use]
pub fn sequence(start: i64, end: i64) -> Vec<i64> {
    if start <= end {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    }
}

/// Parse a boolean spelled `1`, `t`, `true`, `0`, `f` or `false`.
///
/// The words may also be written all upper-case or capitalised. Anything
/// else, including the empty string, yields `None`.
///
/// # Examples
///
/// ```
/// use cliutil::parse_bool;
/// assert_eq!(parse_bool("True"), Some(true));
/// assert_eq!(parse_bool("0"), Some(false));
/// assert_eq!(parse_bool("yes"), None);
/// ```
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
