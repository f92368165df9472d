//! `delimit` parses comma, tab, semicolon and pipe separated text into tables and writes them back.
//!
//! # Example
//! ```
//! use delimit::{Csv, EnumeratedView, NamedView};
//!
//! let text = "name,quote\nAlice,\"she said \"\"hi\"\"\"\n";
//!
//! // rows addressed by header name
//! let csv: Csv<NamedView> = text.parse().unwrap();
//! assert_eq!(csv.rows()[0].get("quote").unwrap(), "she said \"hi\"");
//!
//! // rows addressed by position, with a columns projection
//! let csv: Csv<EnumeratedView> = text.parse().unwrap();
//! assert_eq!(&csv.rows()[0][0], "Alice");
//! assert_eq!(csv.columns().unwrap()[1].header, "quote");
//!
//! assert_eq!(csv.serialized(), text);
//! ```
//!
//! # Design
//! A document is parsed in two passes over the same text. The first reads only the header row,
//! the second is done by the view and reads every row after the header (up to the row limit).
//! Parsing is a single scan with a small state machine; see [`parsers::delimited`] for the exact
//! quoting rules, including what happens with stray quotes and blank lines.
//!
//! When no delimiter is given, it is guessed from the first few kilobytes of text by counting
//! commas, tabs, semicolons and pipes outside quotes ([`parsers::inference`]). The guess falls back
//! to a comma.
//!
//! There are two views:
//! - [`EnumeratedView`]: rows are the raw parsed rows, columns are addressed by position.
//! - [`NamedView`]: rows and columns are addressed by header name. If a header name is repeated,
//!   the first occurrence wins.
//!
//! Either view only builds its columns projection when [`CsvOptions::load_columns`] is set.
//! Otherwise `columns()` is `None`, which is not the same thing as an empty projection.
//!
//! A `Csv` is never mutated after it is built, so it can be shared across threads freely.
//!
//! Rows are not checked against the header width. Short rows read as empty strings through
//! the views, and extra fields are kept in the raw rows but are not reachable by name.

pub mod error;
pub mod options;
pub mod parsers;
pub mod serializer;
pub mod table;
pub mod views;

pub use error::{CsvError, LookupError, ParseError, ParseErrorKind};
pub use options::CsvOptions;
pub use parsers::{Delimiter, delimited::DelimitedParser, inference::guess_delimiter};
pub use serializer::{Serializer, serialize};
pub use table::{Csv, Header, TableRow};
pub use views::{
    EnumeratedColumn, EnumeratedRow, EnumeratedView, NamedColumns, NamedRow, NamedView, TableView,
};
