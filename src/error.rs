//! Error types for the sieve pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SieveError>;

/// Everything that can stop a pipeline run.
///
/// All variants are fatal to the current invocation: there is no partial
/// output once one of these is returned.
#[derive(Debug, Error)]
pub enum SieveError {
    /// A filter clause has no recognized operator, or an empty header/value.
    #[error("Invalid filter: '{clause}'")]
    InvalidFilter { clause: String },

    /// A filter clause or a selected column names a header the source lacks.
    #[error("Header '{header}' not found in CSV file/string")]
    UnknownHeader { header: String },

    /// A row has fewer fields than the column being accessed.
    #[error("Row on line {line} has {width} fields, column {column} is out of range")]
    RowTooShort {
        line: usize,
        column: usize,
        width: usize,
    },

    /// The input file does not exist.
    #[error("File not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The input file exists but could not be opened.
    #[error("Cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from the line source failed mid-stream.
    #[error("Read error: {0}")]
    Io(#[from] io::Error),

    /// A field or line delimiter was configured as the empty string.
    #[error("Delimiter cannot be an empty string")]
    EmptyDelimiter,
}

impl SieveError {
    /// Map a failure to open `path` onto the source-not-found / open split.
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            SieveError::SourceNotFound { path }
        } else {
            SieveError::Open { path, source }
        }
    }
}
