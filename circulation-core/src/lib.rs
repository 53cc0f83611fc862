//! Core library for Circulation.
//!
//! This crate provides the domain models, the delimited-text record store and
//! the checkout/checkin service, independent of any front end.
//!
//! # Usage
//!
//! ```no_run
//! use circulation_core::{FileStore, Library, LibraryConfig};
//!
//! let config = LibraryConfig::load_or_default(None)?;
//! let store = FileStore::from_config(&config);
//! let mut library = Library::new(store, config)?;
//!
//! let patron_id = library.enroll("Alice")?;
//! library.checkout(1, patron_id)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod store;

// Re-export commonly used types at crate root
pub use config::LibraryConfig;
pub use error::{LibraryError, Result, Status, StoreError};
pub use library::Library;
pub use models::{Book, BookState, Patron, NONE, NO_ONE};
pub use store::{FileStore, Loaded, MemoryStore, Record, RecordKind, RecordStore, Saved};
