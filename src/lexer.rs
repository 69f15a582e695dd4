//! Field and line tokenization.
//!
//! Splitting is literal: quote characters in the data are ordinary
//! characters here. Only filter clause values get quote handling, in
//! [`crate::filter`].

use std::iter::FusedIterator;

use crate::error::{Result, SieveError};

/// Split `line` on every occurrence of `delimiter`.
///
/// An empty line yields a single empty field, never an empty vector.
pub fn split_fields(line: &str, delimiter: &str) -> Result<Vec<String>> {
    if delimiter.is_empty() {
        return Err(SieveError::EmptyDelimiter);
    }
    Ok(line.split(delimiter).map(str::to_string).collect())
}

/// Lazily split `text` into lines separated by `line_delimiter`.
///
/// See [`Lines`] for the exact yield rules.
pub fn split_lines<'a>(text: &'a str, line_delimiter: &'a str) -> Lines<'a> {
    Lines {
        rest: Some(text),
        delimiter: line_delimiter,
    }
}

/// Forward-only line iterator over a borrowed string.
///
/// Each step searches only the unconsumed remainder, so a full pass is
/// linear in the input length. Rules:
/// - no delimiter in the text: the text itself is the only line
/// - text ending with the delimiter: a trailing `""` is yielded
/// - empty text: a single `""` is yielded
///
/// An empty delimiter never matches, so the whole text is one line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a str>,
    delimiter: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let found = if self.delimiter.is_empty() {
            None
        } else {
            rest.find(self.delimiter)
        };
        match found {
            Some(idx) => {
                self.rest = Some(&rest[idx + self.delimiter.len()..]);
                Some(&rest[..idx])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

impl FusedIterator for Lines<'_> {}
