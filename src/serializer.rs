//! Writes tables back to delimited text

use crate::parsers::{Delimiter, QUOTE};

const BOM: char = '\u{feff}';

/// Renders records in the format read by [`crate::parsers::delimited::DelimitedParser`]
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    delimiter: Delimiter,
}

impl Serializer {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// A field is quoted iff it contains the delimiter, a quote or a line break, or starts with a
    /// byte order mark
    pub fn needs_quotes(&self, field: &str) -> bool {
        let delimiter = self.delimiter.as_char();
        // a leading BOM is stripped by the parser when unquoted
        field.starts_with(BOM)
            || field
                .chars()
                .any(|c| c == delimiter || c == QUOTE || c == '\n' || c == '\r')
    }

    /// Appends one `\n` terminated record to `out`. A record without fields writes nothing.
    pub fn push_record<S: AsRef<str>>(&self, out: &mut String, fields: &[S]) {
        match fields {
            [] => return,
            // a bare empty line would be skipped on reparse
            [only] if only.as_ref().is_empty() => out.push_str("\"\""),
            fields => {
                for (idx, field) in fields.iter().enumerate() {
                    if idx > 0 {
                        out.push(self.delimiter.as_char());
                    }
                    self.push_field(out, field.as_ref());
                }
            }
        }
        out.push('\n');
    }

    fn push_field(&self, out: &mut String, field: &str) {
        if !self.needs_quotes(field) {
            out.push_str(field);
            return;
        }
        out.push(QUOTE);
        for c in field.chars() {
            if c == QUOTE {
                out.push(QUOTE);
            }
            out.push(c);
        }
        out.push(QUOTE);
    }
}

/// Serializes a header followed by `rows`
pub fn serialize<R: AsRef<[String]>>(header: &[String], rows: &[R], delimiter: Delimiter) -> String {
    let serializer = Serializer::new(delimiter);
    let mut out = String::new();
    serializer.push_record(&mut out, header);
    for row in rows {
        serializer.push_record(&mut out, row.as_ref());
    }
    out
}
