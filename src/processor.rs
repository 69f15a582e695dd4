//! Entry points: transform, filter, project and render in one call.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::config::ProcessOptions;
use crate::error::{Result, SieveError};
use crate::filter::FilterSet;
use crate::pipeline::Pipeline;
use crate::serializer::{Projection, Serializer};
use crate::transform::{LineSource, Transformed, transform_reader, transform_str};

/// Output of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    /// Rendered CSV text.
    pub output: String,
    /// Data rows pulled from the source (header excluded).
    pub rows_read: usize,
    /// Data rows in `output`.
    pub rows_written: usize,
}

/// Runs the pipeline with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    options: ProcessOptions,
}

impl Processor {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    /// Process CSV held in memory.
    pub fn process(&self, text: &str, selected_columns: &str, filter_expression: &str) -> Result<Processed> {
        let transformed = transform_str(text, &self.options)?;
        self.run(transformed, selected_columns, filter_expression)
    }

    /// Process CSV read line by line from `reader`.
    pub fn process_reader<R: BufRead>(
        &self,
        reader: R,
        selected_columns: &str,
        filter_expression: &str,
    ) -> Result<Processed> {
        let transformed = transform_reader(reader, &self.options)?;
        self.run(transformed, selected_columns, filter_expression)
    }

    /// Process the CSV file at `path`.
    ///
    /// The file stays open only while rows are being pulled and is closed on
    /// every return path.
    pub fn process_file(
        &self,
        path: impl AsRef<Path>,
        selected_columns: &str,
        filter_expression: &str,
    ) -> Result<Processed> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SieveError::open(path, e))?;
        debug!(path = %path.display(), "opened source");
        self.process_reader(BufReader::new(file), selected_columns, filter_expression)
    }

    fn run<S: LineSource>(
        &self,
        transformed: Transformed<S>,
        selected_columns: &str,
        filter_expression: &str,
    ) -> Result<Processed> {
        let (headers, mut rows) = transformed.into_parts();

        let filters = FilterSet::parse(filter_expression, &headers)?;
        let predicate = filters.compile(&headers, self.options.arity)?;
        let projection = Projection::resolve(selected_columns, &headers)?;
        let serializer = Serializer::new(projection, &self.options);

        let pipeline = Pipeline::new(rows.by_ref()).filter(predicate);
        let rendered = match self.options.limit {
            Some(n) => serializer.render(&headers, pipeline.limit(n))?,
            None => serializer.render(&headers, pipeline)?,
        };

        let processed = Processed {
            output: rendered.text,
            rows_read: rows.rows_read(),
            rows_written: rendered.rows_written,
        };
        debug!(
            rows_read = processed.rows_read,
            rows_written = processed.rows_written,
            "run complete"
        );
        Ok(processed)
    }
}

/// Filter and project in-memory CSV text with default options.
///
/// ```
/// let csv = "name,age,experience\nAlice,30,5\nBob,25,3\nCharlie,35,10";
/// let out = csv_sieve::process(csv, "name", "age>25\nexperience>3").unwrap();
/// assert_eq!(out, "name\nAlice\nCharlie");
/// ```
pub fn process(text: &str, selected_columns: &str, filter_expression: &str) -> Result<String> {
    Processor::default()
        .process(text, selected_columns, filter_expression)
        .map(|p| p.output)
}

/// Filter and project the CSV file at `path` with default options.
pub fn process_file(
    path: impl AsRef<Path>,
    selected_columns: &str,
    filter_expression: &str,
) -> Result<String> {
    Processor::default()
        .process_file(path, selected_columns, filter_expression)
        .map(|p| p.output)
}

/// Filter and project CSV read from `reader` with default options.
pub fn process_reader<R: BufRead>(
    reader: R,
    selected_columns: &str,
    filter_expression: &str,
) -> Result<String> {
    Processor::default()
        .process_reader(reader, selected_columns, filter_expression)
        .map(|p| p.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArityPolicy;
    use std::io::Cursor;

    const PEOPLE: &str = "name,age,experience\nAlice,30,5\nBob,25,3\nCharlie,35,10";

    #[test]
    fn test_process_filter_and_select() {
        let out = process(PEOPLE, "name", "age>25\nexperience>3").unwrap();
        assert_eq!(out, "name\nAlice\nCharlie");
    }

    #[test]
    fn test_process_counts() {
        let processed = Processor::default()
            .process(PEOPLE, "", "age>29")
            .unwrap();
        assert_eq!(processed.rows_read, 3);
        assert_eq!(processed.rows_written, 2);
        assert_eq!(processed.output, "name,age,experience\nAlice,30,5\nCharlie,35,10");
    }

    #[test]
    fn test_process_limit_stops_reading() {
        let processor = Processor::new(ProcessOptions::new().with_limit(1));
        let processed = processor.process(PEOPLE, "name", "age>29").unwrap();
        assert_eq!(processed.output, "name\nAlice");
        assert_eq!(processed.rows_read, 1);
        assert_eq!(processed.rows_written, 1);
    }

    #[test]
    fn test_process_unknown_filter_header() {
        let err = process(PEOPLE, "name", "height>60").unwrap_err();
        assert!(matches!(err, SieveError::UnknownHeader { ref header } if header == "height"));
    }

    #[test]
    fn test_process_unknown_selection_header() {
        let err = process(PEOPLE, "name,nonexistent", "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Header 'nonexistent' not found in CSV file/string"
        );
    }

    #[test]
    fn test_process_trailing_newline_strict_vs_pad() {
        let text = "name,age\nAlice,30\n";
        // The trailing empty line is a one-field row.
        assert!(matches!(
            process(text, "", "age>1"),
            Err(SieveError::RowTooShort { line: 3, .. })
        ));

        let padded = Processor::new(ProcessOptions::new().with_arity(ArityPolicy::PadEmpty));
        let processed = padded.process(text, "", "age>1").unwrap();
        assert_eq!(processed.output, "name,age\nAlice,30");
    }

    #[test]
    fn test_process_reader_matches_process() {
        let from_reader = process_reader(Cursor::new(PEOPLE), "experience,name", "age<35").unwrap();
        let from_text = process(PEOPLE, "experience,name", "age<35").unwrap();
        assert_eq!(from_reader, from_text);
        assert_eq!(from_reader, "name,experience\nAlice,5\nBob,3");
    }

    #[test]
    fn test_process_selection_ignores_field_delimiter() {
        let processor = Processor::new(ProcessOptions::new().with_field_delimiter(";"));
        let processed = processor
            .process("name;age;experience\nAlice;30;5\nBob;25;3", "age,name", "age>26")
            .unwrap();
        assert_eq!(processed.output, "name;age\nAlice;30");
    }

    #[test]
    fn test_process_rejects_empty_delimiter() {
        let processor = Processor::new(ProcessOptions::new().with_field_delimiter(""));
        assert!(matches!(
            processor.process(PEOPLE, "", ""),
            Err(SieveError::EmptyDelimiter)
        ));
    }
}
