//! Runs the delimit command

use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use delimit::{Csv, CsvOptions, Delimiter, LookupError, NamedRow, NamedView, Serializer};
use log::debug;
use regex::Regex;
use thiserror::Error;
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

use crate::Args;

/// Name shown for stdin in `--count` output
const STDIN_NAME: &str = "-";

/// Errors in a `COLUMN=REGEX` filter argument
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("expected COLUMN=REGEX, got {0:?}")]
    MissingSeparator(String),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Keeps rows whose `column` matches `regex`
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    column: String,
    regex: Regex,
}

impl ColumnFilter {
    fn matches(&self, row: &NamedRow) -> bool {
        row.get(&self.column)
            .is_ok_and(|value| self.regex.is_match(value))
    }
}

impl FromStr for ColumnFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, pattern) = s
            .split_once('=')
            .ok_or_else(|| FilterError::MissingSeparator(s.to_string()))?;
        Ok(Self {
            column: column.to_string(),
            regex: Regex::new(pattern)?,
        })
    }
}

/// A parsed input and the name it is reported under
#[derive(Debug)]
struct Input {
    name: String,
    csv: Csv<NamedView>,
}

fn parse_input(
    name: String,
    text: String,
    options: CsvOptions,
    placeholder_header: bool,
) -> Result<Input> {
    let csv: Csv<NamedView> = if placeholder_header {
        Csv::with_placeholder_header(text, options)
    } else {
        Csv::new(text, options)
    }
    .with_context(|| format!("Failed to parse {name}"))?;
    debug!(
        "Parsed {} with delimiter {} ({} rows)",
        name,
        csv.delimiter(),
        csv.rows().len()
    );
    Ok(Input { name, csv })
}

/// Reads and parses every file concurrently, keeping the order of `files`
async fn load_files(
    files: &[PathBuf],
    options: CsvOptions,
    placeholder_header: bool,
) -> Result<Vec<Input>> {
    let tasks: Vec<_> = files
        .iter()
        .cloned()
        .map(|path| {
            tokio::spawn(async move {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let options = options.with_path_delimiter(&path);
                let name = path.display().to_string();
                tokio::task::spawn_blocking(move || {
                    parse_input(name, text, options, placeholder_header)
                })
                .await?
            })
        })
        .collect();

    let mut inputs = Vec::with_capacity(tasks.len());
    for task in tasks {
        inputs.push(task.await??);
    }
    Ok(inputs)
}

async fn load_stdin(options: CsvOptions, placeholder_header: bool) -> Result<Input> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read stdin")?;
    tokio::task::spawn_blocking(move || {
        parse_input(STDIN_NAME.to_string(), text, options, placeholder_header)
    })
    .await?
}

/// Checks every referenced column exists, so a typo fails loudly instead of matching nothing
fn check_columns<'a>(
    csv: &Csv<NamedView>,
    columns: impl IntoIterator<Item = &'a String>,
) -> Result<(), LookupError> {
    for column in columns {
        if !csv.header().contains(column) {
            return Err(LookupError {
                name: column.clone(),
            });
        }
    }
    Ok(())
}

/// Renders the rows of `input` that pass every filter
fn render(
    input: &Input,
    filters: &[ColumnFilter],
    columns: &[String],
    count: bool,
    output_delimiter: Option<Delimiter>,
) -> Result<String> {
    let csv = &input.csv;
    check_columns(csv, filters.iter().map(|filter| &filter.column))
        .and_then(|()| check_columns(csv, columns))
        .with_context(|| format!("Invalid column in {}", input.name))?;

    let mut rows = csv
        .rows()
        .iter()
        .filter(|row| filters.iter().all(|filter| filter.matches(row)));
    if count {
        return Ok(format!("{}\t{}\n", input.name, rows.count()));
    }

    let serializer = Serializer::new(output_delimiter.unwrap_or(csv.delimiter()));
    let mut out = String::new();
    if columns.is_empty() {
        serializer.push_record(&mut out, csv.header());
        for row in rows {
            serializer.push_record(&mut out, row.as_ref());
        }
    } else {
        serializer.push_record(&mut out, columns);
        rows.try_for_each(|row| {
            let fields = columns
                .iter()
                .map(|column| row.get(column))
                .collect::<Result<Vec<_>, _>>()?;
            serializer.push_record(&mut out, fields.as_slice());
            Ok::<_, LookupError>(())
        })?;
    }
    Ok(out)
}

/// Runs delimit
pub async fn run_delimit(args: Args) -> Result<()> {
    let options = CsvOptions {
        delimiter: args.delimiter,
        // rows are filtered and selected by name, the columns projection is never read
        load_columns: false,
        row_limit: args.limit,
    };

    let inputs = if args.files.is_empty() {
        vec![load_stdin(options, args.placeholder_header).await?]
    } else {
        load_files(&args.files, options, args.placeholder_header).await?
    };

    let mut stdout = io::stdout();
    for input in &inputs {
        let out = render(
            input,
            &args.filters,
            &args.columns,
            args.count,
            args.output_delimiter,
        )?;
        stdout.write_all(out.as_bytes()).await?;
    }
    stdout.flush().await?;
    Ok(())
}
