//! Error and status types shared by the record store and the library service.

use std::fmt;

use thiserror::Error;

use crate::store::{FieldError, RecordKind};

pub type Result<T> = std::result::Result<T, LibraryError>;

/// Failures of the delimited-text record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not open {resource}: {source}")]
    CouldNotOpen {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {kind} record on line {line}: {reason}")]
    MalformedRecord {
        kind: RecordKind,
        line: usize,
        #[source]
        reason: FieldError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a library operation.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("patron {0} is not enrolled")]
    PatronNotEnrolled(i32),

    #[error("book {0} is not in the collection")]
    BookNotInCollection(i32),

    #[error("patron {patron_id} already has {max} books checked out")]
    TooManyOut { patron_id: i32, max: u32 },

    #[error("no patron ID follows {0}")]
    PatronIdsExhausted(i32),

    #[error("book {0} is not checked out")]
    BookNotCheckedOut(i32),

    #[error("book {book_id} is loaned to patron {patron_id}, but {reason}")]
    InconsistentState {
        book_id: i32,
        patron_id: i32,
        reason: &'static str,
    },
}

impl LibraryError {
    pub fn status(&self) -> Status {
        match self {
            Self::Store(StoreError::CouldNotOpen { .. }) | Self::Store(StoreError::Io(_)) => {
                Status::CouldNotOpenFile
            }
            Self::Store(StoreError::MalformedRecord { .. }) => Status::MalformedRecord,
            Self::PatronNotEnrolled(_) => Status::PatronNotEnrolled,
            Self::BookNotInCollection(_) => Status::BookNotInCollection,
            Self::TooManyOut { .. } => Status::TooManyOut,
            Self::PatronIdsExhausted(_) => Status::NoPatronIdAvailable,
            Self::BookNotCheckedOut(_) => Status::BookNotCheckedOut,
            Self::InconsistentState { .. } => Status::InconsistentState,
        }
    }
}

/// Outcome codes of store and library operations.
///
/// The first seven carry the legacy integer values used by existing
/// front ends; the rest extend the range downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    CouldNotOpenFile,
    NoBooksInLibrary,
    NoPatronsInLibrary,
    PatronNotEnrolled,
    BookNotInCollection,
    TooManyOut,
    MalformedRecord,
    BookNotCheckedOut,
    InconsistentState,
    NoPatronIdAvailable,
}

impl Status {
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::CouldNotOpenFile => -1,
            Self::NoBooksInLibrary => -2,
            Self::NoPatronsInLibrary => -3,
            Self::PatronNotEnrolled => -4,
            Self::BookNotInCollection => -5,
            Self::TooManyOut => -6,
            Self::MalformedRecord => -7,
            Self::BookNotCheckedOut => -8,
            Self::InconsistentState => -9,
            Self::NoPatronIdAvailable => -10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::CouldNotOpenFile => "could_not_open_file",
            Self::NoBooksInLibrary => "no_books_in_library",
            Self::NoPatronsInLibrary => "no_patrons_in_library",
            Self::PatronNotEnrolled => "patron_not_enrolled",
            Self::BookNotInCollection => "book_not_in_collection",
            Self::TooManyOut => "too_many_out",
            Self::MalformedRecord => "malformed_record",
            Self::BookNotCheckedOut => "book_not_checked_out",
            Self::InconsistentState => "inconsistent_state",
            Self::NoPatronIdAvailable => "no_patron_id_available",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
