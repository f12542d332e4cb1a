use super::backend::StorageBackend;
use crate::error::{JournalError, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` since the journal is single-threaded, which keeps every
/// `StorageBackend` method on `&self`.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
    failing_keys: RefCell<HashSet<String>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Makes writes to one key fail, leaving the others working.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.borrow_mut().insert(key.to_string());
    }

    /// Test helper to plant a raw value, bypassing any failure simulation.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() || self.failing_keys.borrow().contains(key) {
            return Err(JournalError::Store("Simulated write error".to_string()));
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{EntryKey, Mode, Passage, SavedEntry, ScriptureRef};
    use crate::store::{JournalStore, StorageKeys};
    use chrono::Utc;

    pub fn verse_passage(collection: &str, reference: &str, verse: u32, text: &str) -> Passage {
        let (book, chapter) = split_reference(reference);
        Passage {
            source: ScriptureRef {
                collection: collection.to_string(),
                book,
                chapter,
                verse: Some(verse),
                reference: reference.to_string(),
            },
            mode: Mode::Verse,
            plain_text: text.to_string(),
            rendered_markup: None,
        }
    }

    pub fn chapter_passage(collection: &str, reference: &str, text: &str) -> Passage {
        let (book, chapter) = split_reference(reference);
        Passage {
            source: ScriptureRef {
                collection: collection.to_string(),
                book,
                chapter,
                verse: None,
                reference: reference.to_string(),
            },
            mode: Mode::Chapter,
            plain_text: text.to_string(),
            rendered_markup: None,
        }
    }

    fn split_reference(reference: &str) -> (String, Option<u32>) {
        match reference.rsplit_once(' ') {
            Some((book, rest)) => {
                let chapter = rest.split(':').next().and_then(|c| c.parse().ok());
                (book.to_string(), chapter)
            }
            None => (reference.to_string(), None),
        }
    }

    pub struct StoreFixture {
        pub store: JournalStore<MemBackend>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: JournalStore::new(MemBackend::new(), StorageKeys::default()),
            }
        }

        pub fn with_passage(self, passage: Passage) -> Self {
            self.store
                .add_entry(SavedEntry::from_passage(passage, Utc::now()))
                .unwrap();
            self
        }

        /// Adds `count` verse entries from 1 Nephi 3.
        pub fn with_verses(mut self, count: u32) -> Self {
            for verse in 1..=count {
                self = self.with_passage(verse_passage(
                    "Book of Mormon",
                    &format!("1 Nephi 3:{}", verse),
                    verse,
                    &format!("Verse {} text", verse),
                ));
            }
            self
        }

        pub fn with_note(self, key: &str, note: &str) -> Self {
            self.store.set_note(&EntryKey::from(key), note).unwrap();
            self
        }
    }
}
