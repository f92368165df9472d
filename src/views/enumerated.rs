//! Positional view: fields and columns addressed by index

use std::sync::Arc;

use crate::{
    error::ParseError,
    options::ViewOptions,
    parsers::Delimiter,
    table::{Header, TableRow},
};

use super::{TableView, parse_data_rows};

/// Rows of the enumerated view are the raw parsed rows
pub type EnumeratedRow = TableRow;

/// One column of the table: its header name and the values down that column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedColumn {
    pub header: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EnumeratedView {
    rows: Vec<EnumeratedRow>,
    columns: Option<Vec<EnumeratedColumn>>,
}

impl TableView for EnumeratedView {
    type Row = EnumeratedRow;
    type Columns = Vec<EnumeratedColumn>;

    fn build(
        header: Arc<Header>,
        text: &str,
        delimiter: Delimiter,
        options: &ViewOptions,
    ) -> Result<Self, ParseError> {
        let rows = parse_data_rows(text, delimiter, options)?;
        let columns = options
            .load_columns
            .then(|| project_columns(&header, &rows));
        Ok(Self { rows, columns })
    }

    fn rows(&self) -> &[EnumeratedRow] {
        &self.rows
    }

    fn columns(&self) -> Option<&Vec<EnumeratedColumn>> {
        self.columns.as_ref()
    }
}

/// One column per header entry. Rows shorter than the header read as empty strings, fields past
/// the header are left out.
fn project_columns(header: &Header, rows: &[TableRow]) -> Vec<EnumeratedColumn> {
    header
        .names()
        .iter()
        .enumerate()
        .map(|(idx, name)| EnumeratedColumn {
            header: name.clone(),
            values: rows
                .iter()
                .map(|row| row.get(idx).unwrap_or_default().to_string())
                .collect(),
        })
        .collect()
}
