use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::{codec, FieldError, Loaded, Record, RecordKind, RecordStore, Saved};
use crate::config::LibraryConfig;
use crate::error::StoreError;

/// Record store backed by one text file per record kind.
#[derive(Debug, Clone)]
pub struct FileStore {
    books_path: PathBuf,
    patrons_path: PathBuf,
}

impl FileStore {
    pub fn new(books_path: impl Into<PathBuf>, patrons_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            patrons_path: patrons_path.into(),
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(&config.book_file, &config.patron_file)
    }

    pub fn path_for(&self, kind: RecordKind) -> &Path {
        match kind {
            RecordKind::Book => &self.books_path,
            RecordKind::Patron => &self.patrons_path,
        }
    }
}

impl RecordStore for FileStore {
    fn load<R: Record>(&self) -> Result<Loaded<R>, StoreError> {
        let path = self.path_for(R::KIND);
        let mut file = fs::File::open(path).map_err(|source| StoreError::CouldNotOpen {
            resource: path.display().to_string(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        if bytes.is_empty() {
            tracing::debug!("{} is empty", path.display());
            return Ok(Loaded::Empty);
        }

        let text = String::from_utf8(bytes).map_err(|e| {
            let valid = e.utf8_error().valid_up_to();
            let line = e.as_bytes()[..valid].iter().filter(|&&b| b == b'\n').count() + 1;
            StoreError::MalformedRecord {
                kind: R::KIND,
                line,
                reason: FieldError::new("record", "not valid UTF-8"),
            }
        })?;

        let records = codec::decode(&text)?;
        tracing::debug!("Loaded {} {} records from {}", records.len(), R::KIND, path.display());
        Ok(Loaded::Records(records))
    }

    /// Replaces the file through a sibling temp file and a rename, so readers
    /// never see a half-written list.
    ///
    /// An existing file must open for writing first; a read-only or otherwise
    /// unwritable target is reported as `CouldNotOpen` and left untouched.
    fn save<R: Record>(&mut self, records: &[R]) -> Result<Saved, StoreError> {
        let path = self.path_for(R::KIND);
        if records.is_empty() {
            return Ok(Saved::Empty);
        }

        if path.exists() {
            fs::OpenOptions::new()
                .write(true)
                .open(path)
                .map_err(|source| StoreError::CouldNotOpen {
                    resource: path.display().to_string(),
                    source,
                })?;
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        replace_file(path, codec::encode(records).as_bytes())?;

        tracing::debug!("Saved {} {} records to {}", records.len(), R::KIND, path.display());
        Ok(Saved::Written(records.len()))
    }
}

/// Writes `contents` to `<path>.tmp` and renames it over `path`. The temp
/// file is removed again if any step fails.
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path).map_err(|source| StoreError::CouldNotOpen {
        resource: temp_path.display().to_string(),
        source,
    })?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    drop(file);
    let written = written.and_then(|()| fs::rename(&temp_path, path));

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            tracing::warn!("Could not remove {}: {}", temp_path.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookState, Patron};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("books.txt"), dir.path().join("patrons.txt"))
    }

    #[test]
    fn missing_file_could_not_open() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store.load::<Book>().unwrap_err();
        assert!(matches!(err, StoreError::CouldNotOpen { .. }));
    }

    #[test]
    fn zero_byte_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path_for(RecordKind::Patron), "").unwrap();

        let loaded = store.load::<Patron>().unwrap();
        assert_eq!(loaded, Loaded::Empty);
        assert_eq!(loaded.status(), crate::Status::NoPatronsInLibrary);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut lent = Book::new(2, "Emma", "Austen");
        lent.state = BookState::Out;
        lent.loaned_to_patron_id = 0;
        let books = vec![Book::new(1, "Dune", "Herbert"), lent];

        assert_eq!(store.save(&books).unwrap(), Saved::Written(2));
        assert_eq!(store.load::<Book>().unwrap(), Loaded::Records(books));
    }

    #[test]
    fn saving_nothing_leaves_existing_file_alone() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let path = store.path_for(RecordKind::Patron).to_path_buf();
        fs::write(&path, "0,Ada,1\n").unwrap();

        assert_eq!(store.save::<Patron>(&[]).unwrap(), Saved::Empty);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0,Ada,1\n");
    }

    #[test]
    fn saving_nothing_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.save::<Book>(&[]).unwrap();
        assert!(!store.path_for(RecordKind::Book).exists());
    }

    #[test]
    fn save_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path_for(RecordKind::Patron), "0,Ada,0\n1,Grace,0\n2,Linus,0\n").unwrap();

        store.save(&[Patron::new(0, "Ada")]).unwrap();
        let text = fs::read_to_string(store.path_for(RecordKind::Patron)).unwrap();
        assert_eq!(text, "0,Ada,0\n");
    }

    #[test]
    fn invalid_utf8_is_malformed_not_unopenable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path_for(RecordKind::Patron), b"0,Ada,0\n1,Gr\xffce,0\n").unwrap();

        match store.load::<Patron>().unwrap_err() {
            StoreError::MalformedRecord { kind, line, .. } => {
                assert_eq!(kind, RecordKind::Patron);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unwritable_target_could_not_open() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        fs::create_dir(store.path_for(RecordKind::Book)).unwrap();

        let err = store.save(&[Book::new(1, "Dune", "Herbert")]).unwrap_err();
        assert!(matches!(err, StoreError::CouldNotOpen { .. }));
        assert!(!dir.path().join("books.txt.tmp").exists());
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("patrons.txt");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();

        assert!(replace_file(&target, b"0,Ada,0\n").is_err());
        assert!(!dir.path().join("patrons.txt.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(
            dir.path().join("data/books.txt"),
            dir.path().join("data/patrons.txt"),
        );

        store.save(&[Patron::new(0, "Ada")]).unwrap();
        assert!(dir.path().join("data/patrons.txt").exists());
    }
}
