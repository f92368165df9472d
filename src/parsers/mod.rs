//! Parsers for delimited text

use std::{fmt, str::FromStr};

use crate::error::CsvError;

pub mod delimited;
pub mod inference;

/// Character that opens and closes a quoted field
pub const QUOTE: char = '"';

/// Separator between the fields of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Semicolon,
    Pipe,
    /// Any other single character that is not a quote or a line break
    Other(char),
}

impl Delimiter {
    /// Delimiters considered when guessing, in tie-break order
    pub const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Semicolon,
        Delimiter::Pipe,
    ];

    /// Builds a delimiter from a character, rejecting characters that would clash with quoting or
    /// row termination
    pub fn new(c: char) -> Result<Self, CsvError> {
        let delimiter = match c {
            ',' => Delimiter::Comma,
            '\t' => Delimiter::Tab,
            ';' => Delimiter::Semicolon,
            '|' => Delimiter::Pipe,
            QUOTE | '\r' | '\n' => return Err(CsvError::InvalidDelimiter(c)),
            c => Delimiter::Other(c),
        };
        Ok(delimiter)
    }

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
            Delimiter::Other(c) => c,
        }
    }

    /// Delimiter implied by a file extension, if the extension is unambiguous
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tsv" | "tab" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

impl TryFrom<char> for Delimiter {
    type Error = CsvError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Delimiter::new(c)
    }
}

impl FromStr for Delimiter {
    type Err = CsvError;

    /// Accepts a single character, or the escapes `\t` and `tab` for a tab
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "\\t" || s.eq_ignore_ascii_case("tab") {
            return Ok(Delimiter::Tab);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Delimiter::new(c),
            _ => Err(CsvError::DelimiterLength(s.to_string())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "\\t"),
            other => write!(f, "{}", other.as_char()),
        }
    }
}
