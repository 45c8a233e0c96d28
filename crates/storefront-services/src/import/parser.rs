//! CSV row parser
//!
//! Turns an uploaded body into header-keyed records, lazily and in source order. Rows with
//! the wrong number of fields are accepted: a short row only carries the columns it has and
//! extra trailing fields are dropped.

use std::collections::BTreeMap;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use storefront_core::AppError;

/// One data row keyed by column name.
pub type CsvRecord = BTreeMap<String, String>;

pub struct CsvRowParser<R: Read> {
    headers: StringRecord,
    records: StringRecordsIntoIter<R>,
}

impl<'a> CsvRowParser<&'a [u8]> {
    /// Parser over a fully downloaded object body.
    ///
    /// A zero-length body is `AppError::EmptyBody` and a body that ends inside a quoted field
    /// is `AppError::Parse`, both reported before any row is produced.
    pub fn from_body(key: &str, body: &'a [u8]) -> Result<Self, AppError> {
        if body.is_empty() {
            return Err(AppError::EmptyBody(key.to_string()));
        }
        if ends_inside_quotes(body) {
            return Err(AppError::Parse(format!(
                "{} ends in the middle of a quoted field",
                key
            )));
        }
        Self::new(body)
    }
}

impl<R: Read> CsvRowParser<R> {
    pub fn new(source: R) -> Result<Self, AppError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| AppError::Parse(format!("Failed to read CSV header: {}", e)))?
            .clone();

        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }
}

impl<R: Read> Iterator for CsvRowParser<R> {
    type Item = Result<CsvRecord, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|record| {
                    self.headers
                        .iter()
                        .zip(record.iter())
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect()
                })
                .map_err(|e| AppError::Parse(format!("Failed to read CSV row: {}", e))),
        )
    }
}

/// True when the body finishes inside an open quoted field.
///
/// A quote only opens a field at its start; inside a quoted field `""` is an escaped quote.
fn ends_inside_quotes(body: &[u8]) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut bytes = body.iter().peekable();

    while let Some(&b) = bytes.next() {
        if in_quotes {
            if b == b'"' {
                if bytes.peek() == Some(&&b'"') {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match b {
            b'"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            b',' | b'\n' | b'\r' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    in_quotes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(body: &str) -> Vec<CsvRecord> {
        CsvRowParser::from_body("uploaded/t.csv", body.as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_rows_in_source_order() {
        let rows = rows("id,title,description\n1,Product 1,Description 1\n2,Product 2,\"Two, quoted\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "Product 1");
        assert_eq!(rows[1]["description"], "Two, quoted");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(rows("title,price,count\n").is_empty());
    }

    #[test]
    fn test_ragged_rows_are_tolerated() {
        let rows = rows("title,price,count\nShort,5\nLong,1,2,extra\n");
        assert_eq!(rows[0].len(), 2);
        assert!(!rows[0].contains_key("count"));
        assert_eq!(rows[1]["count"], "2");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_empty_body() {
        let err = CsvRowParser::from_body("uploaded/e.csv", b"").err().unwrap();
        assert!(matches!(err, AppError::EmptyBody(_)));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = CsvRowParser::from_body("uploaded/q.csv", b"title,price\n\"Lamp,10\n")
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_quote_detection() {
        assert!(!ends_inside_quotes(b"a,\"b \"\"c\"\"\",d\n"));
        assert!(!ends_inside_quotes(b"a,5\" screen,d\n"));
        assert!(ends_inside_quotes(b"a,\"open\n"));
    }

    #[test]
    fn test_invalid_utf8_row_is_a_parse_error() {
        let body: &[u8] = b"title,price\n\xff\xfe,1\n";
        let mut parser = CsvRowParser::from_body("uploaded/b.csv", body).unwrap();
        assert!(matches!(parser.next(), Some(Err(AppError::Parse(_)))));
    }
}
