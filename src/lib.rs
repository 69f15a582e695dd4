//! # csv-sieve
//!
//! Streaming CSV row filtering and column projection.
//!
//! Input is read one line at a time and pushed through a pull-based chain
//! of stages, so tables of any length can be sliced without loading them
//! whole. Only the final rendered string is held in memory.
//!
//! ## Overview
//!
//! - **Transform**: first line becomes the header list; later lines become
//!   rows on demand
//! - **Filter**: newline-separated `header<op>value` clauses, all of which
//!   must hold (`=`, `!=`, `>`, `<`, `>=`, `<=`)
//! - **Project**: keep a comma-separated set of columns, always in header
//!   order
//! - **Render**: join fields with `,` and lines with `\n`
//!
//! Comparisons are numeric when both sides parse as integers and
//! lexicographic otherwise.
//!
//! ## Example
//!
//! ```
//! let csv = "name,age,experience\nAlice,30,5\nBob,25,3\nCharlie,35,10";
//!
//! let out = csv_sieve::process(csv, "experience,name", "age>=30").unwrap();
//!
//! assert_eq!(out, "name,experience\nAlice,5\nCharlie,10");
//! ```

pub mod comparison;
pub mod config;
pub mod error;
pub mod filter;
pub mod lexer;
pub mod pipeline;
pub mod processor;
pub mod row;
pub mod serializer;
pub mod transform;

pub use comparison::{Comparison, Operator, satisfies};
pub use config::{ArityPolicy, ProcessOptions};
pub use error::{Result, SieveError};
pub use filter::{ClauseGroup, FilterSet, RowPredicate, matches, parse_clause};
pub use lexer::{Lines, split_fields, split_lines};
pub use pipeline::{Filtered, Pipeline};
pub use processor::{Processed, Processor, process, process_file, process_reader};
pub use row::{Headers, Row};
pub use serializer::{Projection, Rendered, Serializer, project_and_render};
pub use transform::{
    LineSource, ReaderSource, Rows, TextSource, Transformed, transform, transform_reader,
    transform_str,
};
