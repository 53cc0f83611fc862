use speculate2::speculate;

speculate! {
    use circulation_core::{
        Book, BookState, FileStore, Loaded, Patron, RecordKind, RecordStore, Saved, Status,
        StoreError,
    };
    use std::fs;
    use tempfile::TempDir;

    fn setup_store(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("books.txt"), dir.path().join("patrons.txt"))
    }

    describe "load" {
        it "reads every line in order" {
            let dir = TempDir::new().unwrap();
            let store = setup_store(&dir);
            fs::write(dir.path().join("books.txt"), "3,Emma,Austen,1,0\n1,Dune,Herbert,0,-1\n").unwrap();

            let books = store.load::<Book>().unwrap().into_records();
            let ids: Vec<i32> = books.iter().map(|b| b.book_id).collect();
            assert_eq!(ids, vec![3, 1]);
            assert_eq!(books[0].state, BookState::Out);
        }

        it "reports an empty resource with the kind's status" {
            let dir = TempDir::new().unwrap();
            let store = setup_store(&dir);
            fs::write(dir.path().join("books.txt"), "").unwrap();

            let loaded = store.load::<Book>().unwrap();
            assert_eq!(loaded.status(), Status::NoBooksInLibrary);
            assert!(loaded.into_records().is_empty());
        }

        it "fails to open a missing resource" {
            let dir = TempDir::new().unwrap();
            let store = setup_store(&dir);

            let err = store.load::<Patron>().unwrap_err();
            assert!(matches!(err, StoreError::CouldNotOpen { .. }));
        }

        it "rejects a record with the wrong number of fields" {
            let dir = TempDir::new().unwrap();
            let store = setup_store(&dir);
            fs::write(dir.path().join("patrons.txt"), "0,Ada,0\n1,Grace\n").unwrap();

            match store.load::<Patron>() {
                Err(StoreError::MalformedRecord { kind, line, .. }) => {
                    assert_eq!(kind, RecordKind::Patron);
                    assert_eq!(line, 2);
                }
                other => panic!("expected malformed record, got {:?}", other),
            }
        }
    }

    describe "save" {
        it "writes records that load back unchanged" {
            let dir = TempDir::new().unwrap();
            let mut store = setup_store(&dir);
            let patrons = vec![Patron::new(0, "Ada Lovelace"), Patron::new(1, "Grace Hopper")];

            assert_eq!(store.save(&patrons).unwrap(), Saved::Written(2));
            assert_eq!(store.load::<Patron>().unwrap(), Loaded::Records(patrons));
        }

        it "uses the fixed field order" {
            let dir = TempDir::new().unwrap();
            let mut store = setup_store(&dir);

            store.save(&[Book::new(1, "Dune", "Herbert")]).unwrap();
            assert_eq!(fs::read_to_string(dir.path().join("books.txt")).unwrap(), "1,Dune,Herbert,0,-1\n");
        }

        it "skips an empty list without touching the resource" {
            let dir = TempDir::new().unwrap();
            let mut store = setup_store(&dir);
            fs::write(dir.path().join("books.txt"), "1,Dune,Herbert,0,-1\n").unwrap();

            assert_eq!(store.save::<Book>(&[]).unwrap(), Saved::Empty);
            assert_eq!(fs::read_to_string(dir.path().join("books.txt")).unwrap(), "1,Dune,Herbert,0,-1\n");
        }

        it "leaves no temp file behind" {
            let dir = TempDir::new().unwrap();
            let mut store = setup_store(&dir);

            store.save(&[Patron::new(0, "Ada")]).unwrap();
            let names: Vec<String> = fs::read_dir(dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(names, vec!["patrons.txt".to_string()]);
        }
    }
}
