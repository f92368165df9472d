//! `delimit` reads delimited tables (CSV, TSV, semicolon or pipe separated) and writes them back
//! out, optionally filtered, narrowed to some columns, or converted to another delimiter.
//!
//! # Example usage:
//!
//! ```sh
//! # Convert a semicolon separated export to CSV (the delimiter is guessed)
//! delimit export.txt -o ','
//!
//! # Keep the rows whose `state` column matches a regex, and only two columns
//! delimit connections.csv -f 'state=^ESTAB' -c proto,address
//!
//! # `/etc/passwd` has no header, so use a placeholder header ("Col 1", "Col 2", ...)
//! delimit -d ':' -p /etc/passwd -f 'Col 7=bash$'
//!
//! # Count rows in several files, parsed concurrently
//! delimit --count *.csv
//!
//! # Read from stdin, stop after the first 100 data rows
//! cat big.tsv | delimit -n 100
//! ```
//!
//! Set `RUST_LOG=debug` to see which delimiter was guessed and how many rows were read.

use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use delimit::Delimiter;
use runner::{ColumnFilter, run_delimit};

mod runner;

/// `delimit` is a CLI tool for reading, filtering and converting delimited tables
#[derive(Debug, Parser)]
struct Args {
    /// Files to read. Reads stdin if none are given.
    files: Vec<PathBuf>,
    /// Input delimiter, e.g. `,` `;` `|` or `\t`. If not provided, `delimit` guesses it from
    /// the file extension or the first lines of input.
    #[arg(short, long)]
    delimiter: Option<Delimiter>,
    /// Output delimiter. Defaults to the input delimiter.
    #[arg(short, long)]
    output_delimiter: Option<Delimiter>,
    /// Read at most this many data rows per input
    #[arg(short = 'n', long)]
    limit: Option<NonZeroUsize>,
    /// Only keep rows where the named column matches the regex. Can be repeated, all filters
    /// must match.
    #[arg(short, long = "filter", value_name = "COLUMN=REGEX")]
    filters: Vec<ColumnFilter>,
    /// Comma separated names of the columns to output, in order
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,
    /// Add a placeholder header. Should be used when the first line is the first data row and not a header
    /// Placeholder will be "Col 1", "Col 2", etc.
    #[arg(short, long)]
    placeholder_header: bool,
    /// Print the number of matching rows per input instead of the rows
    #[arg(long)]
    count: bool,
}

/// Primary entrypoint for `delimit`
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run_delimit(args).await
}
