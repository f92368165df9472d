//! Name-keyed view: fields and columns addressed by header name
//!
//! Fields are zipped to header names by position. When a header repeats a name, the first
//! occurrence is the one reachable by name. Looking up a name that is not in the header is a
//! caller bug: `get` reports it as a [`LookupError`] and indexing panics.

use std::{collections::HashMap, ops::Index, sync::Arc};

use crate::{
    error::{LookupError, ParseError},
    options::ViewOptions,
    parsers::Delimiter,
    table::{Header, TableRow},
};

use super::{TableView, parse_data_rows};

/// A parsed row addressed by header name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRow {
    header: Arc<Header>,
    row: TableRow,
}

impl NamedRow {
    pub fn new(header: Arc<Header>, row: TableRow) -> Self {
        Self { header, row }
    }

    /// Value of the field called `name`. Names past the end of a short row read as `""`.
    pub fn get(&self, name: &str) -> Result<&str, LookupError> {
        let idx = self.header.position(name).ok_or_else(|| LookupError {
            name: name.to_string(),
        })?;
        Ok(self.row.get(idx).unwrap_or_default())
    }

    /// The row as parsed, including fields past the header
    pub fn raw(&self) -> &TableRow {
        &self.row
    }

    /// `(name, value)` pairs in header order, one per distinct name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .unique_names()
            .map(move |(idx, name)| (name, self.row.get(idx).unwrap_or_default()))
    }

    pub fn to_map(&self) -> HashMap<&str, &str> {
        self.iter().collect()
    }
}

impl Index<&str> for NamedRow {
    type Output = str;

    /// Panics if `name` is not in the header
    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl AsRef<[String]> for NamedRow {
    fn as_ref(&self) -> &[String] {
        self.row.cells()
    }
}

/// Values of every column, keyed by header name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedColumns {
    header: Arc<Header>,
    /// Indexed by header position. Positions of shadowed duplicate names stay empty.
    values: Vec<Vec<String>>,
}

impl NamedColumns {
    fn project(header: Arc<Header>, rows: &[TableRow]) -> Self {
        let mut values = vec![Vec::new(); header.len()];
        for (idx, _) in header.unique_names() {
            values[idx] = rows
                .iter()
                .map(|row| row.get(idx).unwrap_or_default().to_string())
                .collect();
        }
        Self { header, values }
    }

    pub fn get(&self, name: &str) -> Result<&[String], LookupError> {
        self.header
            .position(name)
            .map(|idx| self.values[idx].as_slice())
            .ok_or_else(|| LookupError {
                name: name.to_string(),
            })
    }

    /// `(name, values)` in header order, one per distinct name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.header
            .unique_names()
            .map(move |(idx, name)| (name, self.values[idx].as_slice()))
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.header.unique_names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

impl Index<&str> for NamedColumns {
    type Output = [String];

    /// Panics if `name` is not in the header
    fn index(&self, name: &str) -> &[String] {
        match self.get(name) {
            Ok(values) => values,
            Err(e) => panic!("{e}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamedView {
    rows: Vec<NamedRow>,
    columns: Option<NamedColumns>,
}

impl TableView for NamedView {
    type Row = NamedRow;
    type Columns = NamedColumns;

    fn build(
        header: Arc<Header>,
        text: &str,
        delimiter: Delimiter,
        options: &ViewOptions,
    ) -> Result<Self, ParseError> {
        let rows = parse_data_rows(text, delimiter, options)?;
        let columns = options
            .load_columns
            .then(|| NamedColumns::project(Arc::clone(&header), &rows));
        let rows = rows
            .into_iter()
            .map(|row| NamedRow::new(Arc::clone(&header), row))
            .collect();
        Ok(Self { rows, columns })
    }

    fn rows(&self) -> &[NamedRow] {
        &self.rows
    }

    fn columns(&self) -> Option<&NamedColumns> {
        self.columns.as_ref()
    }
}
