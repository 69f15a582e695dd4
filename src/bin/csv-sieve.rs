//! CLI tool to filter rows and select columns of a CSV file.
//!
//! Usage:
//!   csv-sieve <input.csv> -c name,age -f 'age>25' -f 'experience>3'
//!   csv-sieve - --filter-file filters.txt -o out.csv
//!
//! `-` reads from stdin. Output goes to stdout unless `-o` is given.

use clap::Parser;
use csv_sieve::{ArityPolicy, ProcessOptions, Processor};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filter rows and select columns of a CSV file.
#[derive(Parser)]
#[command(name = "csv-sieve")]
struct Cli {
    /// Input CSV file, or `-` for stdin
    input: String,

    /// Comma-separated columns to keep (default: all)
    #[arg(short, long, default_value = "")]
    columns: String,

    /// Filter clause such as `age>25`; repeat for more (all must hold)
    #[arg(short, long = "filter")]
    filters: Vec<String>,

    /// Read newline-separated filter clauses from a file
    #[arg(long)]
    filter_file: Option<String>,

    /// Field delimiter for input and output
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Read missing trailing fields as empty instead of failing
    #[arg(long)]
    pad_missing: bool,

    /// Stop after this many matching rows
    #[arg(short, long)]
    limit: Option<usize>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Log paths and row counts on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .try_init();

    let mut filter_expression = cli.filters.join("\n");
    if let Some(path) = &cli.filter_file {
        match fs::read_to_string(path) {
            Ok(content) => {
                if !filter_expression.is_empty() {
                    filter_expression.push('\n');
                }
                filter_expression.push_str(&content);
            }
            Err(e) => {
                eprintln!("Error reading filter file '{path}': {e}");
                process::exit(1);
            }
        }
    }

    let mut options = ProcessOptions::new().with_field_delimiter(cli.delimiter.as_str());
    if cli.pad_missing {
        options = options.with_arity(ArityPolicy::PadEmpty);
    }
    if let Some(n) = cli.limit {
        options = options.with_limit(n);
    }
    let processor = Processor::new(options);

    info!(input = %cli.input, output = cli.output.as_deref().unwrap_or("(stdout)"), "starting");

    let result = if cli.input == "-" {
        processor.process_reader(io::stdin().lock(), &cli.columns, &filter_expression)
    } else {
        processor.process_file(&cli.input, &cli.columns, &filter_expression)
    };

    match result {
        Ok(processed) => {
            let output = processed.output;
            if let Some(out_path) = &cli.output {
                if let Some(parent) = Path::new(out_path.as_str()).parent()
                    && !parent.as_os_str().is_empty()
                    && fs::create_dir_all(parent).is_err()
                {
                    eprintln!("Error creating output directory for '{out_path}'");
                    process::exit(1);
                }
                if let Err(e) = fs::write(out_path, &output) {
                    eprintln!("Error writing output file '{out_path}': {e}");
                    process::exit(1);
                }
            } else {
                if let Err(e) = write_output(&mut io::stdout().lock(), &output) {
                    eprintln!("Error writing output: {e}");
                    process::exit(1);
                }
            }
            info!(
                rows_read = processed.rows_read,
                rows_written = processed.rows_written,
                "done"
            );
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

/// Write `output` to a terminal-style stream, ending it with a newline.
fn write_output<W: Write>(out: &mut W, output: &str) -> io::Result<()> {
    out.write_all(output.as_bytes())?;
    if !output.is_empty() && !output.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()
}
