//! Settings for building a `Csv`

use std::{num::NonZeroUsize, path::Path};

use crate::parsers::Delimiter;

/// Options for [`crate::Csv`] constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Delimiter to parse with. Guessed from the text when `None`.
    pub delimiter: Option<Delimiter>,
    /// Whether to build the columns projection alongside the rows
    pub load_columns: bool,
    /// Maximum number of data rows to read, the header excluded
    pub row_limit: Option<NonZeroUsize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            load_columns: true,
            row_limit: None,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets the delimiter from a `.tsv` or `.psv` extension of `path`, unless one is already set
    pub fn with_path_delimiter(self, path: &Path) -> Self {
        let from_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Delimiter::from_extension);
        match (self.delimiter, from_extension) {
            (None, Some(delimiter)) => self.with_delimiter(delimiter),
            _ => self,
        }
    }

    pub fn with_load_columns(mut self, load_columns: bool) -> Self {
        self.load_columns = load_columns;
        self
    }

    pub fn with_row_limit(mut self, row_limit: NonZeroUsize) -> Self {
        self.row_limit = Some(row_limit);
        self
    }
}

/// What a view needs to know to build itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub load_columns: bool,
    pub row_limit: Option<NonZeroUsize>,
    /// Whether the first parsed row is the header and must be skipped
    pub has_header: bool,
}

impl From<&CsvOptions> for ViewOptions {
    fn from(options: &CsvOptions) -> Self {
        Self {
            load_columns: options.load_columns,
            row_limit: options.row_limit,
            has_header: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_delimiter() {
        let options = CsvOptions::default();
        assert_eq!(
            options.with_path_delimiter(Path::new("data.tsv")).delimiter,
            Some(Delimiter::Tab)
        );
        assert_eq!(
            options.with_path_delimiter(Path::new("dir/data.psv")).delimiter,
            Some(Delimiter::Pipe)
        );
        assert_eq!(options.with_path_delimiter(Path::new("data.csv")).delimiter, None);
        assert_eq!(options.with_path_delimiter(Path::new("README")).delimiter, None);
    }

    #[test]
    fn test_path_delimiter_keeps_explicit_delimiter() {
        let options = CsvOptions::default().with_delimiter(Delimiter::Semicolon);
        assert_eq!(
            options.with_path_delimiter(Path::new("data.tsv")).delimiter,
            Some(Delimiter::Semicolon)
        );
    }
}
