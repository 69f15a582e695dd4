//! Options for a pipeline run.

use crate::error::{Result, SieveError};

/// What to do when a row is shorter than the column being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArityPolicy {
    /// Fail the run with [`SieveError::RowTooShort`].
    #[default]
    Strict,
    /// Treat every missing field as the empty string.
    PadEmpty,
}

/// Settings shared by every stage of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Separator between fields, on input and output.
    pub field_delimiter: String,
    /// Separator between lines of in-memory input, and of the output.
    pub line_delimiter: String,
    /// Short-row handling for filtering and projection.
    pub arity: ArityPolicy,
    /// Stop after this many matching rows.
    pub limit: Option<usize>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            field_delimiter: ",".to_string(),
            line_delimiter: "\n".to_string(),
            arity: ArityPolicy::Strict,
            limit: None,
        }
    }
}

impl ProcessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    pub fn with_line_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.line_delimiter = delimiter.into();
        self
    }

    pub fn with_arity(mut self, arity: ArityPolicy) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject settings no run can work with.
    pub fn validate(&self) -> Result<()> {
        if self.field_delimiter.is_empty() || self.line_delimiter.is_empty() {
            return Err(SieveError::EmptyDelimiter);
        }
        Ok(())
    }
}
