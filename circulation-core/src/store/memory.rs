use std::collections::HashMap;
use std::io;

use super::{codec, Loaded, Record, RecordKind, RecordStore, Saved};
use crate::error::StoreError;

/// In-process record store holding the text of each resource.
///
/// A kind with no text behaves like a file that cannot be opened.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    resources: HashMap<RecordKind, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(mut self, text: impl Into<String>) -> Self {
        self.resources.insert(RecordKind::Book, text.into());
        self
    }

    pub fn with_patrons(mut self, text: impl Into<String>) -> Self {
        self.resources.insert(RecordKind::Patron, text.into());
        self
    }

    pub fn contents(&self, kind: RecordKind) -> Option<&str> {
        self.resources.get(&kind).map(String::as_str)
    }
}

impl RecordStore for MemoryStore {
    fn load<R: Record>(&self) -> Result<Loaded<R>, StoreError> {
        let text = self
            .resources
            .get(&R::KIND)
            .ok_or_else(|| StoreError::CouldNotOpen {
                resource: format!("memory:{}", R::KIND),
                source: io::Error::from(io::ErrorKind::NotFound),
            })?;

        if text.is_empty() {
            return Ok(Loaded::Empty);
        }
        Ok(Loaded::Records(codec::decode(text)?))
    }

    fn save<R: Record>(&mut self, records: &[R]) -> Result<Saved, StoreError> {
        if records.is_empty() {
            return Ok(Saved::Empty);
        }
        self.resources.insert(R::KIND, codec::encode(records));
        Ok(Saved::Written(records.len()))
    }
}
