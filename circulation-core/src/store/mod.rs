//! Persistence of books and patrons as delimited text records.

mod codec;
mod file;
mod memory;

use std::fmt;

pub use codec::{decode, encode, parse_field, FieldError, Record, DELIMITER};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{Status, StoreError};

/// Which resource a record type lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Book,
    Patron,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Patron => "patron",
        }
    }

    /// Status reported when the resource holds no records.
    pub fn empty_status(&self) -> Status {
        match self {
            Self::Book => Status::NoBooksInLibrary,
            Self::Patron => Status::NoPatronsInLibrary,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<R> {
    Records(Vec<R>),
    /// The resource exists but is zero bytes long.
    Empty,
}

impl<R: Record> Loaded<R> {
    pub fn status(&self) -> Status {
        match self {
            Self::Records(_) => Status::Success,
            Self::Empty => R::KIND.empty_status(),
        }
    }

    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Records(records) => records,
            Self::Empty => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Written(usize),
    /// Nothing to write; the resource was left untouched.
    Empty,
}

/// Load/save of a homogeneous record list, one resource per [`RecordKind`].
pub trait RecordStore {
    fn load<R: Record>(&self) -> Result<Loaded<R>, StoreError>;

    fn save<R: Record>(&mut self, records: &[R]) -> Result<Saved, StoreError>;
}
