use serde::{Deserialize, Serialize};

use super::NONE;
use crate::store::{parse_field, FieldError, Record, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patron {
    pub patron_id: i32,
    pub name: String,
    pub number_books_checked_out: u32,
}

impl Patron {
    pub fn new(patron_id: i32, name: impl Into<String>) -> Self {
        Self {
            patron_id,
            name: name.into(),
            number_books_checked_out: NONE,
        }
    }
}

impl Record for Patron {
    const KIND: RecordKind = RecordKind::Patron;
    const FIELD_COUNT: usize = 3;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.patron_id.to_string(),
            self.name.clone(),
            self.number_books_checked_out.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        let [id, name, checked_out] = fields else {
            return Err(FieldError::count(Self::FIELD_COUNT, fields.len()));
        };

        Ok(Self {
            patron_id: parse_field("patron_id", id)?,
            name: (*name).to_string(),
            number_books_checked_out: parse_field("number_books_checked_out", checked_out)?,
        })
    }
}
