//! Line codec for the comma-delimited record files.
//!
//! One record per line, fields in a fixed order, no header and no escaping.
//! A comma inside a text field shifts every later field, so such records do
//! not survive a round trip.

use std::str::FromStr;

use thiserror::Error;

use super::RecordKind;
use crate::error::StoreError;

pub const DELIMITER: char = ',';

/// A flat, fixed-shape row of the record store.
pub trait Record: Sized {
    const KIND: RecordKind;
    const FIELD_COUNT: usize;

    /// Fields in file order.
    fn to_fields(&self) -> Vec<String>;

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}`: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn count(expected: usize, found: usize) -> Self {
        Self::new("record", format!("expected {expected} fields, found {found}"))
    }
}

/// Parses a numeric field, naming it in the error.
pub fn parse_field<T>(field: &'static str, raw: &str) -> Result<T, FieldError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| FieldError::new(field, format!("{raw:?} is not a number ({e})")))
}

/// Decodes records until the first blank line or the end of `text`.
pub fn decode<R: Record>(text: &str) -> Result<Vec<R>, StoreError> {
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            break;
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let record = R::from_fields(&fields).map_err(|reason| StoreError::MalformedRecord {
            kind: R::KIND,
            line: idx + 1,
            reason,
        })?;
        records.push(record);
    }

    Ok(records)
}

pub fn encode<R: Record>(records: &[R]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_fields().join(&DELIMITER.to_string()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookState, Patron, NO_ONE};

    #[test]
    fn decodes_book_lines() {
        let books: Vec<Book> = decode("1,Dune,Herbert,0,-1\n2,Emma,Austen,1,0\n").unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].loaned_to_patron_id, NO_ONE);
        assert_eq!(books[1].state, BookState::Out);
    }

    #[test]
    fn stops_at_first_blank_line() {
        let patrons: Vec<Patron> = decode("0,Ada,0\n\n1,Grace,0\n").unwrap();
        assert_eq!(patrons.len(), 1);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let patrons: Vec<Patron> = decode("0,Ada,2\r\n1,Grace,0\r\n").unwrap();
        assert_eq!(patrons[0].number_books_checked_out, 2);
        assert_eq!(patrons[1].name, "Grace");
    }

    #[test]
    fn reports_line_of_malformed_record() {
        let err = decode::<Patron>("0,Ada,0\nx,Grace,0\n").unwrap_err();
        match err {
            StoreError::MalformedRecord { kind, line, reason } => {
                assert_eq!(kind, RecordKind::Patron);
                assert_eq!(line, 2);
                assert_eq!(reason.field, "patron_id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn comma_in_title_breaks_the_record() {
        let book = Book::new(3, "Eats, Shoots and Leaves", "Truss");
        let text = encode(&[book]);
        assert!(decode::<Book>(&text).is_err());
    }

    #[test]
    fn encodes_one_terminated_line_per_record() {
        let text = encode(&[Patron::new(0, "Ada"), Patron::new(1, "Grace")]);
        assert_eq!(text, "0,Ada,0\n1,Grace,0\n");
    }
}
