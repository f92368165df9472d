//! Errors raised while parsing, looking up and loading tables

use std::io;

use thiserror::Error;

/// Why a parse failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("quoted field is never closed")]
    UnterminatedQuote,
    #[error("unexpected character {0:?} after closing quote")]
    UnexpectedCharAfterQuote(char),
}

/// A malformed document. Fatal to the whole parse, no partial rows are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (record {record}, line {line}, byte {position})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Zero-based index of the record being read, the header included
    pub record: usize,
    /// One-based physical line
    pub line: usize,
    /// Byte offset into the parsed text
    pub position: usize,
}

/// A field name that is not part of the header
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no column named {name:?} in header")]
pub struct LookupError {
    pub name: String,
}

/// Errors that can occur when building a `Csv`
#[derive(Debug, Error)]
pub enum CsvError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("{0:?} cannot be used as a delimiter")]
    InvalidDelimiter(char),
    #[error("delimiter must be a single character, got {0:?}")]
    DelimiterLength(String),
}
