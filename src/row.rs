//! Header list and row types.

use crate::config::ArityPolicy;
use crate::error::{Result, SieveError};

/// Ordered column names taken from the first line of the source.
///
/// Duplicate names are allowed; lookups resolve to the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    names: Vec<String>,
}

impl Headers {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Index of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    /// Like [`Headers::position`], but an absent name is an error.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| SieveError::UnknownHeader {
                header: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<String>> for Headers {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<&[&str]> for Headers {
    fn from(names: &[&str]) -> Self {
        Self::new(names.iter().map(|s| s.to_string()).collect())
    }
}

/// One tokenized data line.
///
/// `line` is the 1-based line number in the source (the header is line 1),
/// used to point errors at the offending row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: usize,
    fields: Vec<String>,
}

impl Row {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `column`, applying `policy` when the row is too short.
    pub fn field(&self, column: usize, policy: ArityPolicy) -> Result<&str> {
        match self.fields.get(column) {
            Some(value) => Ok(value.as_str()),
            None => match policy {
                ArityPolicy::PadEmpty => Ok(""),
                ArityPolicy::Strict => Err(SieveError::RowTooShort {
                    line: self.line,
                    column,
                    width: self.fields.len(),
                }),
            },
        }
    }
}
