use serde::{Deserialize, Serialize};

use super::NO_ONE;
use crate::store::{parse_field, FieldError, Record, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub state: BookState,
    /// Patron holding the book, or [`NO_ONE`] while it is on the shelf.
    pub loaned_to_patron_id: i32,
}

impl Book {
    /// A shelved book that nobody has borrowed.
    pub fn new(book_id: i32, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
            author: author.into(),
            state: BookState::In,
            loaned_to_patron_id: NO_ONE,
        }
    }

    /// The patron the book is loaned to, if it is out.
    pub fn borrower(&self) -> Option<i32> {
        match self.state {
            BookState::Out if self.loaned_to_patron_id != NO_ONE => Some(self.loaned_to_patron_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookState {
    In,
    Out,
}

impl BookState {
    pub fn as_ordinal(&self) -> i64 {
        match self {
            Self::In => 0,
            Self::Out => 1,
        }
    }

    pub fn from_ordinal(n: i64) -> Option<Self> {
        match n {
            0 => Some(Self::In),
            1 => Some(Self::Out),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl Record for Book {
    const KIND: RecordKind = RecordKind::Book;
    const FIELD_COUNT: usize = 5;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.book_id.to_string(),
            self.title.clone(),
            self.author.clone(),
            self.state.as_ordinal().to_string(),
            self.loaned_to_patron_id.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        let [id, title, author, state, loaned_to] = fields else {
            return Err(FieldError::count(Self::FIELD_COUNT, fields.len()));
        };

        let ordinal: i64 = parse_field("state", state)?;
        let state = BookState::from_ordinal(ordinal)
            .ok_or_else(|| FieldError::new("state", format!("unknown ordinal {ordinal}")))?;

        Ok(Self {
            book_id: parse_field("book_id", id)?,
            title: (*title).to_string(),
            author: (*author).to_string(),
            state,
            loaned_to_patron_id: parse_field("loaned_to_patron_id", loaned_to)?,
        })
    }
}
