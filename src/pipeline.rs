//! Pull-based stage chaining over a row stream.
//!
//! Each stage is an iterator adapter that pulls from the one before it
//! only when asked, so at most one row is in flight.
//!
//! ```
//! use csv_sieve::{ArityPolicy, FilterSet, Pipeline, ProcessOptions, transform_str};
//!
//! let options = ProcessOptions::default();
//! let (headers, rows) = transform_str("name,age\nAlice,30\nBob,25", &options)
//!     .unwrap()
//!     .into_parts();
//! let filters = FilterSet::parse("age>26", &headers).unwrap();
//! let predicate = filters.compile(&headers, ArityPolicy::Strict).unwrap();
//!
//! let kept: Vec<_> = Pipeline::new(rows)
//!     .filter(predicate)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].fields()[0], "Alice");
//! ```

use std::iter::{FusedIterator, Take};

use tracing::trace;

use crate::error::Result;
use crate::filter::RowPredicate;
use crate::row::Row;

/// A chain of row stages.
#[derive(Debug)]
pub struct Pipeline<I> {
    rows: I,
}

impl<I> Pipeline<I>
where
    I: Iterator<Item = Result<Row>>,
{
    pub fn new(rows: I) -> Self {
        Self { rows }
    }

    /// Keep only rows the predicate accepts, in order.
    pub fn filter<'f>(self, predicate: RowPredicate<'f>) -> Pipeline<Filtered<'f, I>> {
        Pipeline {
            rows: Filtered {
                rows: self.rows,
                predicate,
                done: false,
            },
        }
    }

    /// Stop after `n` rows; upstream is not pulled past the nth.
    pub fn limit(self, n: usize) -> Pipeline<Take<I>> {
        Pipeline {
            rows: self.rows.take(n),
        }
    }
}

impl<I> Iterator for Pipeline<I>
where
    I: Iterator<Item = Result<Row>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        self.rows.next()
    }
}

/// Filtering stage: yields the rows a [`RowPredicate`] accepts.
///
/// An error from upstream or from the predicate is yielded at the point of
/// the offending row and ends the stage. Rows already yielded stay valid.
#[derive(Debug)]
pub struct Filtered<'f, I> {
    rows: I,
    predicate: RowPredicate<'f>,
    done: bool,
}

impl<I> Iterator for Filtered<'_, I>
where
    I: Iterator<Item = Result<Row>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        for row in self.rows.by_ref() {
            let outcome = row.and_then(|row| self.predicate.matches(&row).map(|ok| (ok, row)));
            match outcome {
                Ok((true, row)) => return Some(Ok(row)),
                Ok((false, row)) => trace!(line = row.line(), "row rejected"),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        None
    }
}

impl<I> FusedIterator for Filtered<'_, I> where I: Iterator<Item = Result<Row>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArityPolicy;
    use crate::error::SieveError;
    use crate::filter::FilterSet;
    use crate::row::Headers;

    fn headers() -> Headers {
        Headers::from(&["name", "age"][..])
    }

    fn rows(data: &[&[&str]]) -> Vec<Result<Row>> {
        data.iter()
            .enumerate()
            .map(|(i, fields)| Ok(Row::new(i + 2, fields.iter().map(|s| s.to_string()).collect())))
            .collect()
    }

    fn names(rows: Vec<Row>) -> Vec<String> {
        rows.into_iter().map(|r| r.fields()[0].clone()).collect()
    }

    #[test]
    fn test_passthrough() {
        let input = rows(&[&["A", "1"], &["B", "2"]]);
        let out: Vec<Row> = Pipeline::new(input.into_iter())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names(out), vec!["A", "B"]);
    }

    #[test]
    fn test_filter_preserves_order() {
        let h = headers();
        let set = FilterSet::parse("age>1", &h).unwrap();
        let input = rows(&[&["A", "3"], &["B", "1"], &["C", "2"], &["D", "5"]]);
        let out: Vec<Row> = Pipeline::new(input.into_iter())
            .filter(set.compile(&h, ArityPolicy::Strict).unwrap())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names(out), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_empty_filter_is_noop() {
        let h = headers();
        let set = FilterSet::empty();
        let input = rows(&[&["A", "3"], &["B", "1"]]);
        let out: Vec<Row> = Pipeline::new(input.into_iter())
            .filter(set.compile(&h, ArityPolicy::Strict).unwrap())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names(out), vec!["A", "B"]);
    }

    #[test]
    fn test_short_row_error_after_valid_rows() {
        let h = headers();
        let set = FilterSet::parse("age>0", &h).unwrap();
        let input = rows(&[&["A", "3"], &["B"], &["C", "2"]]);
        let mut pipeline = Pipeline::new(input.into_iter())
            .filter(set.compile(&h, ArityPolicy::Strict).unwrap());

        let first = pipeline.next().unwrap().unwrap();
        assert_eq!(first.fields()[0], "A");
        match pipeline.next() {
            Some(Err(SieveError::RowTooShort { line, .. })) => assert_eq!(line, 3),
            other => panic!("Expected RowTooShort, got {other:?}"),
        }
        assert!(pipeline.next().is_none());
    }

    #[test]
    fn test_upstream_error_propagates() {
        let h = headers();
        let set = FilterSet::empty();
        let input: Vec<Result<Row>> = vec![
            Ok(Row::new(2, vec!["A".into(), "1".into()])),
            Err(SieveError::Io(std::io::Error::other("boom"))),
        ];
        let result: Result<Vec<Row>> = Pipeline::new(input.into_iter())
            .filter(set.compile(&h, ArityPolicy::Strict).unwrap())
            .collect();
        assert!(matches!(result, Err(SieveError::Io(_))));
    }

    #[test]
    fn test_limit_stops_pulling_upstream() {
        let h = headers();
        let set = FilterSet::parse("age>1", &h).unwrap();
        let input = rows(&[&["A", "3"], &["B", "1"], &["C", "2"], &["D", "5"]]);
        let mut source = input.into_iter();
        let out: Vec<Row> = Pipeline::new(source.by_ref())
            .filter(set.compile(&h, ArityPolicy::Strict).unwrap())
            .limit(2)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names(out), vec!["A", "C"]);
        // D was never pulled.
        assert_eq!(source.len(), 1);
    }
}
