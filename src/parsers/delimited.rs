//! Parses input where cells are separated by a delimiter
//!
//! Scans the text one character at a time. Quoted fields may contain the delimiter, line breaks and
//! doubled quotes (`""` reads as one `"`). A quote inside an unquoted field is kept as a literal
//! character, while anything other than a delimiter or line break after a closing quote is an error.
//! Lines with no characters at all are skipped.

use std::{iter::Peekable, str::CharIndices};

use log::trace;

use crate::{
    error::{ParseError, ParseErrorKind},
    table::TableRow,
};

use super::{Delimiter, QUOTE};

/// Byte order mark some editors put at the start of UTF-8 files
const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    UnquotedField,
    QuotedField,
    /// Just read a quote inside a quoted field: either an escaped quote or the closing quote
    QuoteInQuotedField,
    RowEnd,
}

/// Parser for character separated input
#[derive(Debug, Clone, Copy)]
pub struct DelimitedParser {
    delimiter: Delimiter,
}

impl DelimitedParser {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Lazily yields the rows of `text`. Nothing past the last requested row is scanned.
    pub fn rows<'a>(&self, text: &'a str) -> Rows<'a> {
        let (text, base) = match text.strip_prefix(BOM) {
            Some(rest) => (rest, BOM.len_utf8()),
            None => (text, 0),
        };
        Rows {
            chars: text.char_indices().peekable(),
            base,
            delimiter: self.delimiter.as_char(),
            record: 0,
            line: 1,
            failed: false,
        }
    }

    /// Parses at most `row_limit` rows of `text`, or all of them if no limit is given
    pub fn parse(&self, text: &str, row_limit: Option<usize>) -> Result<Vec<TableRow>, ParseError> {
        let rows = self.rows(text);
        let rows: Vec<TableRow> = match row_limit {
            Some(limit) => rows.take(limit).collect::<Result<_, _>>()?,
            None => rows.collect::<Result<_, _>>()?,
        };
        trace!("Parsed {} rows with delimiter {}", rows.len(), self.delimiter);
        Ok(rows)
    }
}

/// Iterator over the rows of a document. Stops after the first error.
pub struct Rows<'a> {
    chars: Peekable<CharIndices<'a>>,
    /// Bytes stripped from the front of the text, added back to reported positions
    base: usize,
    delimiter: char,
    record: usize,
    line: usize,
    failed: bool,
}

impl Rows<'_> {
    fn read_row(&mut self) -> Result<Option<TableRow>, ParseError> {
        let mut cells = Vec::new();
        let mut cell = String::new();
        let mut state = State::FieldStart;
        // position and line of the opening quote of the current quoted field
        let mut opened_at = (0, self.line);

        while state != State::RowEnd {
            let Some((position, c)) = self.chars.next() else {
                break;
            };
            state = match (state, c) {
                (State::FieldStart, QUOTE) => {
                    opened_at = (position, self.line);
                    State::QuotedField
                }
                (State::FieldStart, '\r' | '\n') if cells.is_empty() => {
                    // blank line
                    self.end_line(c);
                    State::FieldStart
                }
                (State::FieldStart | State::UnquotedField | State::QuoteInQuotedField, c)
                    if c == self.delimiter =>
                {
                    cells.push(std::mem::take(&mut cell));
                    State::FieldStart
                }
                (
                    State::FieldStart | State::UnquotedField | State::QuoteInQuotedField,
                    '\r' | '\n',
                ) => {
                    self.end_line(c);
                    State::RowEnd
                }
                (State::FieldStart | State::UnquotedField, c) => {
                    cell.push(c);
                    State::UnquotedField
                }
                (State::QuotedField, QUOTE) => State::QuoteInQuotedField,
                (State::QuotedField, c) => {
                    let ends_line = c == '\n'
                        || (c == '\r' && !matches!(self.chars.peek(), Some((_, '\n'))));
                    if ends_line {
                        self.line += 1;
                    }
                    cell.push(c);
                    State::QuotedField
                }
                (State::QuoteInQuotedField, QUOTE) => {
                    cell.push(QUOTE);
                    State::QuotedField
                }
                (State::QuoteInQuotedField, c) => {
                    return Err(self.error(
                        ParseErrorKind::UnexpectedCharAfterQuote(c),
                        position,
                        self.line,
                    ));
                }
                (State::RowEnd, _) => State::RowEnd,
            };
        }

        match state {
            State::QuotedField => {
                let (position, line) = opened_at;
                Err(self.error(ParseErrorKind::UnterminatedQuote, position, line))
            }
            // only blank lines (or nothing) left
            State::FieldStart if cells.is_empty() && cell.is_empty() => Ok(None),
            _ => {
                cells.push(cell);
                self.record += 1;
                Ok(Some(TableRow::new(cells)))
            }
        }
    }

    /// Consumes the rest of a line break, treating `\r\n` as one break
    fn end_line(&mut self, c: char) {
        if c == '\r' {
            self.chars.next_if(|&(_, next)| next == '\n');
        }
        self.line += 1;
    }

    fn error(&self, kind: ParseErrorKind, position: usize, line: usize) -> ParseError {
        ParseError {
            kind,
            record: self.record,
            line,
            position: self.base + position,
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<TableRow, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_row() {
            Ok(Some(row)) => {
                trace!("Parsed row: {:?}", row);
                Some(Ok(row))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>, ParseError> {
        let rows = DelimitedParser::new(delimiter).parse(text, None)?;
        Ok(rows.into_iter().map(|row| row.cells().to_vec()).collect())
    }

    fn parse_comma(text: &str) -> Vec<Vec<String>> {
        parse(text, Delimiter::Comma).unwrap()
    }

    fn owned(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_simple() {
        let rows = parse_comma("a,b,c\n1,2,3\n4,5,6");
        assert_eq!(
            rows,
            owned(&[&["a", "b", "c"], &["1", "2", "3"], &["4", "5", "6"]])
        );
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let rows = parse_comma("name,quote\nAlice,\"she said \"\"hi\"\"\"\n");
        assert_eq!(rows[1][1], "she said \"hi\"");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_embedded_delimiter() {
        let rows = parse_comma("a,b\n\"x,y\",z");
        assert_eq!(rows[1], vec!["x,y".to_string(), "z".to_string()]);
    }

    #[test]
    fn test_parse_embedded_newline() {
        let rows = parse_comma("a,b\n\"multi\nline\",z");
        assert_eq!(rows[1][0], "multi\nline");
        assert_eq!(rows[1][1], "z");
        let rows = parse_comma("a,b\r\n\"multi\r\nline\",z\r\n");
        assert_eq!(rows[1][0], "multi\r\nline");
    }

    #[test]
    fn test_parse_line_endings() {
        let expected = owned(&[&["a", "b"], &["1", "2"], &["3", "4"]]);
        assert_eq!(parse_comma("a,b\r\n1,2\r\n3,4\r\n"), expected);
        assert_eq!(parse_comma("a,b\r1,2\r3,4"), expected);
        assert_eq!(parse_comma("a,b\n1,2\r\n3,4\r"), expected);
    }

    #[test]
    fn test_parse_blank_lines_skipped() {
        let rows = parse_comma("a,b\n\n1,2\n\r\n\n3,4\n\n");
        assert_eq!(rows, owned(&[&["a", "b"], &["1", "2"], &["3", "4"]]));
        assert!(parse_comma("").is_empty());
        assert!(parse_comma("\n\n").is_empty());
    }

    #[test]
    fn test_parse_empty_fields() {
        let rows = parse_comma(",\na,,b\n\"\"\n");
        assert_eq!(rows, owned(&[&["", ""], &["a", "", "b"], &[""]]));
        // trailing delimiter at end of input still closes a field
        assert_eq!(parse_comma("a,"), owned(&[&["a", ""]]));
    }

    #[test]
    fn test_parse_no_trimming() {
        let rows = parse_comma(" a , b \n\"  q  \",x");
        assert_eq!(rows, owned(&[&[" a ", " b "], &["  q  ", "x"]]));
    }

    #[test]
    fn test_parse_ragged_rows_kept() {
        let rows = parse_comma("a,b,c\n1\n1,2,3,4");
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn test_parse_other_delimiters() {
        let rows = parse("a\tb\n\"x\ty\"\t2", Delimiter::Tab).unwrap();
        assert_eq!(rows, owned(&[&["a", "b"], &["x\ty", "2"]]));
        let rows = parse("a;b\n1,5;2", Delimiter::Semicolon).unwrap();
        assert_eq!(rows, owned(&[&["a", "b"], &["1,5", "2"]]));
        let rows = parse("root:x:0", Delimiter::Other(':')).unwrap();
        assert_eq!(rows, owned(&[&["root", "x", "0"]]));
    }

    #[test]
    fn test_parse_stray_quote_is_literal() {
        let rows = parse_comma("a,b\nab\"c,5\" inches");
        assert_eq!(rows[1], vec!["ab\"c".to_string(), "5\" inches".to_string()]);
    }

    #[test]
    fn test_parse_unexpected_char_after_quote() {
        let err = parse("a,b\n\"ab\"c,d", Delimiter::Comma).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCharAfterQuote('c'));
        assert_eq!(err.record, 1);
        assert_eq!(err.line, 2);
        assert_eq!(err.position, 8);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse("a,b\n1,2\n3,\"open\nstill open", Delimiter::Comma).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedQuote);
        assert_eq!(err.record, 2);
        // reported at the opening quote
        assert_eq!(err.line, 3);
        assert_eq!(err.position, 10);
    }

    #[test]
    fn test_parse_error_line_counts_quoted_newlines() {
        let err = parse("\"a\nb\",c\n\"x\"y", Delimiter::Comma).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.record, 1);
    }

    #[test]
    fn test_parse_bom_stripped() {
        let text = "\u{feff}a,b\n1,\"2";
        let parser = DelimitedParser::new(Delimiter::Comma);
        let rows = parser.parse(text, Some(1)).unwrap();
        assert_eq!(rows[0].cells(), ["a", "b"]);
        // positions still refer to the original text
        let err = parser.parse(text, None).unwrap_err();
        assert_eq!(err.position, text.find("\"2").unwrap());
    }

    #[test]
    fn test_parse_row_limit() {
        let parser = DelimitedParser::new(Delimiter::Comma);
        let text = "a,b\n1,2\n3,4\n5,6";
        let rows = parser.parse(text, Some(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells(), ["a", "b"]);
        assert_eq!(parser.parse(text, Some(3)).unwrap().len(), 3);
        assert_eq!(parser.parse(text, Some(10)).unwrap().len(), 4);
        assert!(parser.parse(text, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_row_limit_stops_before_malformed_rows() {
        let parser = DelimitedParser::new(Delimiter::Comma);
        let text = "a,b\n\"never closed";
        assert!(parser.parse(text, Some(1)).is_ok());
        assert!(parser.parse(text, None).is_err());
    }

    #[test]
    fn test_rows_iterator_stops_after_error() {
        let parser = DelimitedParser::new(Delimiter::Comma);
        let mut rows = parser.rows("a\n\"b\"c\nd");
        assert!(rows.next().unwrap().is_ok());
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_parse_matches_csv_crate() {
        let inputs = [
            "a,b,c\n1,2,3\n",
            "\"a\",\"b\"\"\",c\r\n\"1\n2\",,3\r\n",
            "x,\"y,z\"\n\"\",\"\"\"\"\n",
            "one\ntwo,three\nfour,five,six\n",
            "h1,h2\r1,2\r",
            "unicode,ünïcødé\n\"日本,語\",✓\n",
        ];
        for input in inputs {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(input.as_bytes());
            let expected: Vec<Vec<String>> = reader
                .records()
                .map(|record| record.unwrap().iter().map(|s| s.to_string()).collect())
                .collect();
            assert_eq!(parse_comma(input), expected, "input: {input:?}");
        }
    }
}
