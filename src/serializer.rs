//! Column projection and CSV rendering.
//!
//! Output columns always follow header order. Selecting `"experience,name"`
//! against `name,age,experience` renders `name,experience`.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::{ArityPolicy, ProcessOptions};
use crate::error::Result;
use crate::row::{Headers, Row};

/// Which columns to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every field of every row, as read.
    All,
    /// These column indexes, ascending.
    Columns(Vec<usize>),
}

impl Projection {
    /// Resolve a comma-separated list of column names against `headers`.
    ///
    /// The list is always split on `,`, whatever the field delimiter. An
    /// empty selection keeps everything. Naming a column twice, or in any
    /// order, does not change the result.
    pub fn resolve(selection: &str, headers: &Headers) -> Result<Self> {
        if selection.is_empty() {
            return Ok(Projection::All);
        }
        let mut indexes = BTreeSet::new();
        for name in selection.split(',') {
            indexes.insert(headers.resolve(name)?);
        }
        let indexes: Vec<usize> = indexes.into_iter().collect();
        debug!(?indexes, "resolved projection");
        Ok(Projection::Columns(indexes))
    }

    /// Append the projected `fields` to `out`, joined by `delimiter`.
    fn write_fields(
        &self,
        out: &mut String,
        row: &Row,
        delimiter: &str,
        arity: ArityPolicy,
    ) -> Result<()> {
        match self {
            Projection::All => join_into(out, row.fields().iter().map(String::as_str), delimiter),
            Projection::Columns(indexes) => {
                for (n, &index) in indexes.iter().enumerate() {
                    if n > 0 {
                        out.push_str(delimiter);
                    }
                    out.push_str(row.field(index, arity)?);
                }
            }
        }
        Ok(())
    }

    fn write_headers(&self, out: &mut String, headers: &Headers, delimiter: &str) {
        match self {
            Projection::All => join_into(out, headers.names().iter().map(String::as_str), delimiter),
            Projection::Columns(indexes) => join_into(
                out,
                indexes.iter().filter_map(|&i| headers.get(i)),
                delimiter,
            ),
        }
    }
}

fn join_into<'a>(out: &mut String, parts: impl Iterator<Item = &'a str>, delimiter: &str) {
    for (n, part) in parts.enumerate() {
        if n > 0 {
            out.push_str(delimiter);
        }
        out.push_str(part);
    }
}

/// Rendered output plus how many data rows went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub rows_written: usize,
}

/// Renders a header list and a row stream as CSV text.
#[derive(Debug, Clone)]
pub struct Serializer {
    projection: Projection,
    field_delimiter: String,
    line_delimiter: String,
    arity: ArityPolicy,
}

impl Serializer {
    pub fn new(projection: Projection, options: &ProcessOptions) -> Self {
        Self {
            projection,
            field_delimiter: options.field_delimiter.clone(),
            line_delimiter: options.line_delimiter.clone(),
            arity: options.arity,
        }
    }

    /// Drain `rows` and render the header line followed by one line per row.
    ///
    /// Lines are joined with the line delimiter; nothing follows the last
    /// line. The first error from `rows` or from a short row aborts
    /// rendering.
    pub fn render<I>(&self, headers: &Headers, rows: I) -> Result<Rendered>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        let mut text = String::new();
        self.projection
            .write_headers(&mut text, headers, &self.field_delimiter);

        let mut rows_written = 0;
        for row in rows {
            let row = row?;
            text.push_str(&self.line_delimiter);
            self.projection
                .write_fields(&mut text, &row, &self.field_delimiter, self.arity)?;
            rows_written += 1;
        }

        Ok(Rendered { text, rows_written })
    }
}

/// Project `rows` to the columns named in `selection` and render them.
///
/// Uses `,` and `\n` with strict arity.
pub fn project_and_render<I>(headers: &Headers, rows: I, selection: &str) -> Result<String>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let options = ProcessOptions::default();
    let projection = Projection::resolve(selection, headers)?;
    let rendered = Serializer::new(projection, &options).render(headers, rows)?;
    Ok(rendered.text)
}
