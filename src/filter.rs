//! Filter expression parsing and row evaluation.
//!
//! Filter format, one clause per line:
//! ```text
//! age>25
//! experience >= 3
//! name != "Smith, John"
//! ```
//!
//! - Operators: `=`, `!=`, `>`, `<`, `>=`, `<=`
//! - Whitespace around the operator is ignored
//! - A value wrapped in matching `"` or `'` has the quotes removed; anything
//!   inside, commas included, is kept as-is
//! - Blank lines are skipped
//! - All clauses must hold for a row to pass, including several clauses on
//!   the same header

use tracing::debug;

use crate::comparison::{Comparison, Operator};
use crate::config::ArityPolicy;
use crate::error::{Result, SieveError};
use crate::row::{Headers, Row};

/// Clauses targeting one header, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseGroup {
    pub header: String,
    pub comparisons: Vec<Comparison>,
}

/// All clauses of one run, grouped by header.
///
/// Groups keep the order in which each header first appeared; evaluation
/// order is decided by [`RowPredicate`], not by this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    groups: Vec<ClauseGroup>,
}

impl FilterSet {
    /// A filter set that accepts every row.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse newline-separated clauses, checking headers against `headers`.
    ///
    /// The first bad clause aborts the parse; no partial set is returned.
    pub fn parse(text: &str, headers: &Headers) -> Result<Self> {
        let mut set = FilterSet::empty();

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let comparison = parse_clause(line)?;
            if !headers.contains(&comparison.header) {
                return Err(SieveError::UnknownHeader {
                    header: comparison.header,
                });
            }
            set.push(comparison);
        }

        debug!(
            clauses = set.clause_count(),
            headers = set.groups.len(),
            "parsed filter set"
        );
        Ok(set)
    }

    /// Append a clause, grouping it with earlier clauses on the same header.
    pub fn push(&mut self, comparison: Comparison) {
        match self
            .groups
            .iter_mut()
            .find(|g| g.header == comparison.header)
        {
            Some(group) => group.comparisons.push(comparison),
            None => self.groups.push(ClauseGroup {
                header: comparison.header.clone(),
                comparisons: vec![comparison],
            }),
        }
    }

    /// Clauses registered for `header`; empty when it has none.
    pub fn comparisons_for(&self, header: &str) -> &[Comparison] {
        self.groups
            .iter()
            .find(|g| g.header == header)
            .map(|g| g.comparisons.as_slice())
            .unwrap_or(&[])
    }

    pub fn groups(&self) -> &[ClauseGroup] {
        &self.groups
    }

    pub fn clause_count(&self) -> usize {
        self.groups.iter().map(|g| g.comparisons.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Bind this set to column positions in `headers`.
    ///
    /// Headers missing from `headers` are rejected here too, so a set built
    /// with [`FilterSet::push`] gets the same check as a parsed one.
    pub fn compile<'f>(&'f self, headers: &Headers, arity: ArityPolicy) -> Result<RowPredicate<'f>> {
        let mut checks = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let column = headers.resolve(&group.header)?;
            checks.push(ColumnCheck {
                column,
                comparisons: &group.comparisons,
            });
        }
        checks.sort_by_key(|c| c.column);
        Ok(RowPredicate { checks, arity })
    }
}

/// Split one clause line into a [`Comparison`].
///
/// The operator is the leftmost one in the line, longest symbol first at
/// that position.
pub fn parse_clause(line: &str) -> Result<Comparison> {
    let invalid = || SieveError::InvalidFilter {
        clause: line.to_string(),
    };

    let (start, operator) = line
        .char_indices()
        .find_map(|(idx, _)| Operator::match_prefix(&line[idx..]).map(|op| (idx, op)))
        .ok_or_else(invalid)?;

    let header = line[..start].trim();
    let value = strip_quotes(line[start + operator.symbol().len()..].trim());

    if header.is_empty() || value.is_empty() {
        return Err(invalid());
    }

    Ok(Comparison::new(header, operator, value))
}

/// Remove one matching pair of surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Column check: one header's clauses bound to its column index.
#[derive(Debug, Clone)]
struct ColumnCheck<'f> {
    column: usize,
    comparisons: &'f [Comparison],
}

/// A [`FilterSet`] resolved against a header list, ready to test rows.
///
/// Checks run in header order and stop at the first failing column.
#[derive(Debug, Clone)]
pub struct RowPredicate<'f> {
    checks: Vec<ColumnCheck<'f>>,
    arity: ArityPolicy,
}

impl RowPredicate<'_> {
    /// Does `row` satisfy every clause?
    pub fn matches(&self, row: &Row) -> Result<bool> {
        for check in &self.checks {
            let value = row.field(check.column, self.arity)?;
            if !check.comparisons.iter().all(|c| c.is_satisfied_by(value)) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True when there is nothing to check.
    pub fn accepts_all(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Test one row against `filters` resolved through `headers`.
///
/// Convenience for single rows; streams should compile once with
/// [`FilterSet::compile`].
pub fn matches(row: &Row, headers: &Headers, filters: &FilterSet) -> Result<bool> {
    filters.compile(headers, ArityPolicy::Strict)?.matches(row)
}
