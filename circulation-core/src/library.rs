//! Enrollment and checkout/checkin over a [`RecordStore`].
//!
//! The service keeps no durable cache. Each public operation except
//! [`Library::enroll`] reloads both lists from the store, acts on them, and
//! saves them back when it mutated anything. The store is assumed to have a
//! single writer: two processes running operations against the same files can
//! interleave their reload and save steps and lose updates.
//!
//! A failed reload keeps the previous lists but marks them stale, and
//! `enroll` reloads before building on stale lists.

use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result, StoreError};
use crate::models::{Book, BookState, Patron, NONE, NO_ONE};
use crate::store::{Loaded, Record, RecordStore};

#[derive(Debug)]
pub struct Library<S> {
    store: S,
    config: LibraryConfig,
    books: Vec<Book>,
    patrons: Vec<Patron>,
    stale: bool,
}

impl<S: RecordStore> Library<S> {
    /// Builds the service and loads the current records once.
    pub fn new(store: S, config: LibraryConfig) -> Result<Self> {
        let mut library = Self {
            store,
            config,
            books: Vec::new(),
            patrons: Vec::new(),
            stale: false,
        };
        library.reload_all_data()?;
        Ok(library)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Books as of the last reload.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Patrons as of the last reload or enrollment.
    pub fn patrons(&self) -> &[Patron] {
        &self.patrons
    }

    /// Replaces both in-memory lists with what the store holds now.
    ///
    /// A resource that is empty or cannot be opened yields an empty list.
    /// Malformed records and read failures are returned, and the lists stay
    /// as they were until a later reload succeeds.
    pub fn reload_all_data(&mut self) -> Result<()> {
        let loaded = self
            .load_or_empty::<Patron>()
            .and_then(|patrons| Ok((patrons, self.load_or_empty::<Book>()?)));

        match loaded {
            Ok((patrons, books)) => {
                self.patrons = patrons;
                self.books = books;
                self.stale = false;
                Ok(())
            }
            Err(e) => {
                self.stale = true;
                Err(e)
            }
        }
    }

    fn load_or_empty<R: Record>(&self) -> Result<Vec<R>> {
        match self.store.load::<R>() {
            Ok(Loaded::Records(records)) => Ok(records),
            Ok(Loaded::Empty) => {
                tracing::debug!("No {} records stored ({})", R::KIND, R::KIND.empty_status());
                Ok(Vec::new())
            }
            Err(StoreError::CouldNotOpen { resource, source }) => {
                tracing::warn!("Treating {} as empty: could not open: {}", resource, source);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_book(&self, book_id: i32) -> Option<&Book> {
        self.books.iter().find(|b| b.book_id == book_id)
    }

    pub fn get_patron(&self, patron_id: i32) -> Option<&Patron> {
        self.patrons.iter().find(|p| p.patron_id == patron_id)
    }

    /// Lends `book_id` to `patron_id`.
    ///
    /// The patron is checked before the book: a patron at the limit gets
    /// [`LibraryError::TooManyOut`] even for an unknown book.
    pub fn checkout(&mut self, book_id: i32, patron_id: i32) -> Result<()> {
        self.reload_all_data()?;

        let max = self.config.max_books_allowed_out;
        let patron = self
            .patrons
            .iter_mut()
            .find(|p| p.patron_id == patron_id)
            .ok_or(LibraryError::PatronNotEnrolled(patron_id))?;

        if patron.number_books_checked_out >= max {
            return Err(LibraryError::TooManyOut { patron_id, max });
        }

        let book = self
            .books
            .iter_mut()
            .find(|b| b.book_id == book_id)
            .ok_or(LibraryError::BookNotInCollection(book_id))?;

        book.loaned_to_patron_id = patron.patron_id;
        book.state = BookState::Out;
        patron.number_books_checked_out += 1;

        self.persist()?;
        tracing::info!("Checked out book {} to patron {}", book_id, patron_id);
        Ok(())
    }

    /// Returns `book_id` to the shelf and releases it from its borrower.
    pub fn checkin(&mut self, book_id: i32) -> Result<()> {
        self.reload_all_data()?;

        let book = self
            .books
            .iter_mut()
            .find(|b| b.book_id == book_id)
            .ok_or(LibraryError::BookNotInCollection(book_id))?;

        if book.state == BookState::In {
            return Err(LibraryError::BookNotCheckedOut(book_id));
        }

        let patron_id = book.loaned_to_patron_id;
        let patron = self
            .patrons
            .iter_mut()
            .find(|p| p.patron_id == patron_id)
            .ok_or(LibraryError::InconsistentState {
                book_id,
                patron_id,
                reason: "no such patron is enrolled",
            })?;

        let remaining = patron.number_books_checked_out.checked_sub(1).ok_or(
            LibraryError::InconsistentState {
                book_id,
                patron_id,
                reason: "the patron has no books checked out",
            },
        )?;

        book.state = BookState::In;
        book.loaned_to_patron_id = NO_ONE;
        patron.number_books_checked_out = remaining;

        self.persist()?;
        tracing::info!("Checked in book {} from patron {}", book_id, patron_id);
        Ok(())
    }

    /// Adds a patron and returns the new ID.
    ///
    /// The ID is one past the ID of the last patron in memory, or 0 when
    /// there are none. Unlike the other operations this does not reload
    /// first, so it builds on whatever the last operation left in memory,
    /// unless the last reload failed. Only the patron resource is written.
    pub fn enroll(&mut self, name: &str) -> Result<i32> {
        if self.stale {
            self.reload_all_data()?;
        }

        let patron_id = match self.patrons.last() {
            None => 0,
            Some(last) => last
                .patron_id
                .checked_add(1)
                .ok_or(LibraryError::PatronIdsExhausted(last.patron_id))?,
        };

        self.patrons.push(Patron {
            patron_id,
            name: name.to_string(),
            number_books_checked_out: NONE,
        });
        if let Err(e) = self.store.save(&self.patrons) {
            self.patrons.pop();
            return Err(e.into());
        }

        tracing::info!("Enrolled patron {} ({})", patron_id, name);
        Ok(patron_id)
    }

    pub fn numb_books(&mut self) -> Result<usize> {
        self.reload_all_data()?;
        Ok(self.books.len())
    }

    pub fn numb_patrons(&mut self) -> Result<usize> {
        self.reload_all_data()?;
        Ok(self.patrons.len())
    }

    pub fn how_many_books_checked_out(&mut self, patron_id: i32) -> Result<u32> {
        self.reload_all_data()?;
        self.get_patron(patron_id)
            .map(|p| p.number_books_checked_out)
            .ok_or(LibraryError::PatronNotEnrolled(patron_id))
    }

    pub fn what_is_patron_name(&mut self, patron_id: i32) -> Result<String> {
        self.reload_all_data()?;
        self.get_patron(patron_id)
            .map(|p| p.name.clone())
            .ok_or(LibraryError::PatronNotEnrolled(patron_id))
    }

    // Books first, then patrons. A failure between the two leaves the files
    // out of step with each other.
    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.books)?;
        self.store.save(&self.patrons)?;
        Ok(())
    }
}
