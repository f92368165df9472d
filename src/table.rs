//! The `Csv` facade and the row and header types it is built from

use std::{
    collections::HashMap,
    fmt, fs, io,
    ops::Index,
    path::Path,
    str::FromStr,
    sync::Arc,
};

use log::debug;

use crate::{
    error::{CsvError, ParseError},
    options::{CsvOptions, ViewOptions},
    parsers::{Delimiter, delimited::DelimitedParser, inference::guess_delimiter},
    serializer,
    views::{NamedView, TableView},
};

/// Represents a row in the table, exactly as the tokenizer produced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<String>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Index<usize> for TableRow {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.cells[idx]
    }
}

impl AsRef<[String]> for TableRow {
    fn as_ref(&self) -> &[String] {
        &self.cells
    }
}

impl From<Vec<String>> for TableRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

/// Field names of a table with a name to position lookup
///
/// Names are assumed unique. When they are not, the first occurrence wins and later duplicates
/// can only be reached by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    /// `Col 1`, `Col 2`, ... for tables whose first line is already data
    pub fn placeholder(width: usize) -> Self {
        Self::new((0..width).map(|i| format!("Col {}", i + 1)).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of the first column called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Names in header order, skipping duplicates that lost to an earlier occurrence
    pub fn unique_names(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names
            .iter()
            .enumerate()
            .filter(move |(idx, name)| self.position(name) == Some(*idx))
            .map(|(idx, name)| (idx, name.as_str()))
    }
}

/// A parsed table: header, original text, delimiter and a view over the rows
///
/// Nothing is mutated after construction. To reparse with other settings, build a new `Csv`.
#[derive(Debug)]
pub struct Csv<V: TableView = NamedView> {
    header: Arc<Header>,
    text: String,
    delimiter: Delimiter,
    view: V,
}

impl<V: TableView> Csv<V> {
    /// Parses `text`, guessing the delimiter unless `options` names one
    ///
    /// The header is read first on its own, then the view parses the whole text. An empty text
    /// gives an empty header and no rows.
    pub fn new(text: impl Into<String>, options: CsvOptions) -> Result<Self, ParseError> {
        let text = text.into();
        let delimiter = Self::resolve_delimiter(&text, &options);
        let header = Self::first_row(&text, delimiter)?;
        debug!("Parsed header with {} columns", header.len());
        Self::build(
            Header::new(header.into_cells()),
            text,
            delimiter,
            ViewOptions::from(&options),
        )
    }

    /// Parses `text` with a known delimiter and default options
    pub fn with_delimiter(text: impl Into<String>, delimiter: Delimiter) -> Result<Self, ParseError> {
        Self::new(text, CsvOptions::default().with_delimiter(delimiter))
    }

    /// Parses `text` whose first line is a data row rather than a header
    ///
    /// The header becomes `Col 1`, `Col 2`, ... sized by the first row.
    pub fn with_placeholder_header(
        text: impl Into<String>,
        options: CsvOptions,
    ) -> Result<Self, ParseError> {
        let text = text.into();
        let delimiter = Self::resolve_delimiter(&text, &options);
        let first_row = Self::first_row(&text, delimiter)?;
        let view_options = ViewOptions {
            has_header: false,
            ..ViewOptions::from(&options)
        };
        Self::build(
            Header::placeholder(first_row.len()),
            text,
            delimiter,
            view_options,
        )
    }

    /// Reads and parses a file
    ///
    /// Without a delimiter in `options`, a `.tsv` or `.psv` extension decides it, otherwise it is
    /// guessed. Read failures are returned as [`CsvError::Io`].
    pub fn from_path(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self, CsvError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let options = options.with_path_delimiter(path);
        debug!("Loaded {} bytes from {}", text.len(), path.display());
        Ok(Self::new(text, options)?)
    }

    /// Loads `name.extension` from a resource directory
    ///
    /// Returns `Ok(None)` if the resource does not exist, so a missing resource can be told apart
    /// from one that exists but is unreadable or malformed.
    pub fn from_resource(
        dir: impl AsRef<Path>,
        name: &str,
        extension: &str,
        options: CsvOptions,
    ) -> Result<Option<Self>, CsvError> {
        let path = dir.as_ref().join(format!("{name}.{extension}"));
        match Self::from_path(&path, options) {
            Ok(csv) => Ok(Some(csv)),
            Err(CsvError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Resource {} not found", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn resolve_delimiter(text: &str, options: &CsvOptions) -> Delimiter {
        options.delimiter.unwrap_or_else(|| guess_delimiter(text))
    }

    fn first_row(text: &str, delimiter: Delimiter) -> Result<TableRow, ParseError> {
        let mut rows = DelimitedParser::new(delimiter).parse(text, Some(1))?;
        Ok(rows.pop().unwrap_or_default())
    }

    fn build(
        header: Header,
        text: String,
        delimiter: Delimiter,
        view_options: ViewOptions,
    ) -> Result<Self, ParseError> {
        let header = Arc::new(header);
        let view = V::build(Arc::clone(&header), &text, delimiter, &view_options)?;
        debug!(
            "Built view with {} rows and {} columns",
            view.rows().len(),
            header.len()
        );
        Ok(Self {
            header,
            text,
            delimiter,
            view,
        })
    }

    pub fn header(&self) -> &[String] {
        self.header.names()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn rows(&self) -> &[V::Row] {
        self.view.rows()
    }

    /// `None` when columns were not requested, which is different from a table without columns
    pub fn columns(&self) -> Option<&V::Columns> {
        self.view.columns()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// The header and rows rendered back to delimited text
    pub fn serialized(&self) -> String {
        serializer::serialize(self.header.names(), self.view.rows(), self.delimiter)
    }
}

impl<V: TableView> fmt::Display for Csv<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized())
    }
}

impl<V: TableView> FromStr for Csv<V> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s, CsvOptions::default())
    }
}
