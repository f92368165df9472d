//! Presentations of parsed rows
//!
//! Both views are built the same way from a header, the raw text and a delimiter: the text is
//! parsed once, the header row is skipped and the remaining rows are wrapped. The columns
//! projection is only built when asked for, and is `None` otherwise.

use std::sync::Arc;

use log::debug;

use crate::{
    error::ParseError,
    options::ViewOptions,
    parsers::{Delimiter, delimited::DelimitedParser},
    table::{Header, TableRow},
};

pub mod enumerated;
pub mod named;

pub use enumerated::{EnumeratedColumn, EnumeratedRow, EnumeratedView};
pub use named::{NamedColumns, NamedRow, NamedView};

/// Shared contract of the positional and name-keyed views
pub trait TableView: Sized {
    type Row: AsRef<[String]>;
    type Columns;

    fn build(
        header: Arc<Header>,
        text: &str,
        delimiter: Delimiter,
        options: &ViewOptions,
    ) -> Result<Self, ParseError>;

    fn rows(&self) -> &[Self::Row];

    fn columns(&self) -> Option<&Self::Columns>;
}

/// Parses the data rows of `text`, honoring the header and row limit settings
pub(crate) fn parse_data_rows(
    text: &str,
    delimiter: Delimiter,
    options: &ViewOptions,
) -> Result<Vec<TableRow>, ParseError> {
    let mut rows = DelimitedParser::new(delimiter).rows(text);
    if options.has_header {
        // a malformed header must not be silently skipped
        if let Some(Err(e)) = rows.next() {
            return Err(e);
        }
    }
    let rows: Vec<TableRow> = match options.row_limit {
        Some(limit) => rows.take(limit.get()).collect::<Result<_, _>>()?,
        None => rows.collect::<Result<_, _>>()?,
    };
    debug!("Parsed {} data rows", rows.len());
    Ok(rows)
}
