//! Turn a line source into a header list and a lazy row stream.
//!
//! The first line becomes the [`Headers`]; every later line is split into
//! a [`Row`] only when the consumer asks for it. Nothing proportional to
//! the number of rows already produced is kept.

use std::io::BufRead;

use crate::config::ProcessOptions;
use crate::error::{Result, SieveError};
use crate::lexer::{Lines, split_fields, split_lines};
use crate::row::{Headers, Row};

/// Anything that can hand out lines one at a time.
///
/// Lines come without their terminators.
pub trait LineSource {
    type Line: AsRef<str>;

    /// The next line, `None` once the source is exhausted.
    fn next_line(&mut self) -> Option<Result<Self::Line>>;
}

/// Lines of an in-memory string, split with [`split_lines`].
#[derive(Debug, Clone)]
pub struct TextSource<'a> {
    lines: Lines<'a>,
}

impl<'a> TextSource<'a> {
    pub fn new(text: &'a str, line_delimiter: &'a str) -> Self {
        Self {
            lines: split_lines(text, line_delimiter),
        }
    }
}

impl<'a> LineSource for TextSource<'a> {
    type Line = &'a str;

    fn next_line(&mut self) -> Option<Result<&'a str>> {
        self.lines.next().map(Ok)
    }
}

/// Lines of a buffered reader, with `\n` / `\r\n` stripped.
///
/// A final terminator does not produce an extra empty line.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    type Line = String;

    fn next_line(&mut self) -> Option<Result<String>> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(Ok(line))
            }
            Err(e) => {
                self.done = true;
                Some(Err(SieveError::Io(e)))
            }
        }
    }
}

/// Lazy, single-pass stream of tokenized rows.
#[derive(Debug)]
pub struct Rows<S> {
    source: S,
    delimiter: String,
    rows_read: usize,
    done: bool,
}

impl<S> Rows<S> {
    /// Data rows pulled from the source so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl<S: LineSource> Iterator for Rows<S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        let line = match self.source.next_line() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e));
            }
            None => {
                self.done = true;
                return None;
            }
        };
        self.rows_read += 1;
        // Header is line 1.
        let number = self.rows_read + 1;
        Some(split_fields(line.as_ref(), &self.delimiter).map(|fields| Row::new(number, fields)))
    }
}

/// Output of the transform stage.
#[derive(Debug)]
pub struct Transformed<S> {
    pub headers: Headers,
    pub rows: Rows<S>,
}

impl<S> Transformed<S> {
    pub fn into_parts(self) -> (Headers, Rows<S>) {
        (self.headers, self.rows)
    }
}

/// Read the header line from `source` and wrap the rest as lazy rows.
///
/// An exhausted source behaves like a single empty line: one empty header.
pub fn transform<S: LineSource>(mut source: S, field_delimiter: &str) -> Result<Transformed<S>> {
    let first = source.next_line().transpose()?;
    let names = match &first {
        Some(line) => split_fields(line.as_ref(), field_delimiter)?,
        None => split_fields("", field_delimiter)?,
    };
    Ok(Transformed {
        headers: Headers::new(names),
        rows: Rows {
            source,
            delimiter: field_delimiter.to_string(),
            rows_read: 0,
            done: first.is_none(),
        },
    })
}

/// Transform an in-memory CSV string.
pub fn transform_str<'a>(text: &'a str, options: &'a ProcessOptions) -> Result<Transformed<TextSource<'a>>> {
    options.validate()?;
    transform(
        TextSource::new(text, &options.line_delimiter),
        &options.field_delimiter,
    )
}

/// Transform CSV read line by line from `reader`.
pub fn transform_reader<R: BufRead>(
    reader: R,
    options: &ProcessOptions,
) -> Result<Transformed<ReaderSource<R>>> {
    options.validate()?;
    transform(ReaderSource::new(reader), &options.field_delimiter)
}
