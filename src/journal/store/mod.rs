//! # Storage Layer
//!
//! The journal persists two independent collections under two storage keys:
//!
//! - **entries** (`savedEntries`): a JSON array of saved passages, in save order
//! - **notes** (`savedNotes`): a JSON object mapping [`EntryKey`] to note text
//!
//! [`StorageBackend`] is the raw durable key/value layer. [`JournalStore`] holds the
//! journal rules on top of it.
//!
//! ## Rules
//!
//! - **Whole-collection writes**: every mutation reads the collection, changes it and
//!   writes all of it back. Last writer wins; two processes sharing one data directory
//!   are not reconciled.
//! - **Corruption heals**: a missing or unparseable value loads as an empty collection
//!   and a warning is logged. The next write replaces it with valid data.
//! - **Decode once**: stored records are normalized into [`SavedEntry`] at load time
//!   (see [`record`]), so markup and mode are always present in memory.
//! - **No partial removal**: removing an entry writes entries then notes. If the notes
//!   write fails, the previous entries are written back before the error is returned.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── savedEntries.json   # [{volume, book, chapter, verse, reference, text, mode, html, savedAt}]
//! ├── savedNotes.json     # {"<collection>|<reference>": "note"}
//! └── config.json         # JournalConfig
//! ```

use crate::error::{JournalError, Result};
use crate::model::{EntryKey, SavedEntry};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

pub mod backend;
pub mod fs;
pub mod memory;
pub mod record;

pub use backend::StorageBackend;
use record::StoredEntry;

pub const DEFAULT_ENTRIES_KEY: &str = "savedEntries";
pub const DEFAULT_NOTES_KEY: &str = "savedNotes";

/// Notes by entry key.
pub type NotesMap = BTreeMap<EntryKey, String>;

/// The two storage keys the journal lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub entries: String,
    pub notes: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES_KEY.to_string(),
            notes: DEFAULT_NOTES_KEY.to_string(),
        }
    }
}

pub struct JournalStore<B: StorageBackend> {
    backend: B,
    keys: StorageKeys,
}

impl<B: StorageBackend> JournalStore<B> {
    pub fn new(backend: B, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn load_entries(&self) -> Result<Vec<SavedEntry>> {
        let records: Vec<StoredEntry> = self.load_collection(&self.keys.entries)?;
        Ok(records.into_iter().map(StoredEntry::decode).collect())
    }

    pub fn save_entries(&self, entries: &[SavedEntry]) -> Result<()> {
        let records: Vec<StoredEntry> = entries.iter().map(StoredEntry::encode).collect();
        let json = serde_json::to_string_pretty(&records)?;
        self.backend.write(&self.keys.entries, &json)
    }

    pub fn load_notes(&self) -> Result<NotesMap> {
        self.load_collection(&self.keys.notes)
    }

    pub fn save_notes(&self, notes: &NotesMap) -> Result<()> {
        let json = serde_json::to_string_pretty(notes)?;
        self.backend.write(&self.keys.notes, &json)
    }

    pub fn find_entry(&self, key: &EntryKey) -> Result<Option<SavedEntry>> {
        Ok(self.load_entries()?.into_iter().find(|e| &e.key() == key))
    }

    pub fn note(&self, key: &EntryKey) -> Result<Option<String>> {
        Ok(self.load_notes()?.remove(key))
    }

    /// Appends `entry` unless one with the same key is already saved.
    pub fn add_entry(&self, entry: SavedEntry) -> Result<()> {
        let mut entries = self.load_entries()?;
        let key = entry.key();
        if entries.iter().any(|e| e.key() == key) {
            return Err(JournalError::DuplicateEntry(key));
        }
        entries.push(entry);
        self.save_entries(&entries)?;
        tracing::debug!(%key, "added entry");
        Ok(())
    }

    /// Removes the entry and its note. Returns the removed entry, if there was one.
    pub fn remove_entry(&self, key: &EntryKey) -> Result<Option<SavedEntry>> {
        let previous = self.load_entries()?;
        let mut notes = self.load_notes()?;

        let (removed, kept): (Vec<SavedEntry>, Vec<SavedEntry>) =
            previous.iter().cloned().partition(|e| &e.key() == key);
        let had_note = notes.remove(key).is_some();

        if !removed.is_empty() {
            self.save_entries(&kept)?;
        }
        if had_note {
            if let Err(err) = self.save_notes(&notes) {
                if !removed.is_empty() {
                    if let Err(rollback) = self.save_entries(&previous) {
                        tracing::warn!(%key, error = %rollback, "could not restore entries");
                    }
                }
                return Err(err);
            }
        }

        tracing::debug!(%key, removed = removed.len(), had_note, "removed entry");
        Ok(removed.into_iter().next())
    }

    /// Stores the trimmed note under `key` and returns what was stored.
    pub fn set_note(&self, key: &EntryKey, text: &str) -> Result<String> {
        let mut notes = self.load_notes()?;
        let trimmed = text.trim().to_string();
        notes.insert(key.clone(), trimmed.clone());
        self.save_notes(&notes)?;
        tracing::debug!(%key, len = trimmed.len(), "saved note");
        Ok(trimmed)
    }

    /// Replaces the rendered markup of one entry.
    pub fn update_markup(&self, key: &EntryKey, markup: &str) -> Result<SavedEntry> {
        let mut entries = self.load_entries()?;
        let entry = entries
            .iter_mut()
            .find(|e| &e.key() == key)
            .ok_or_else(|| JournalError::EntryNotFound(key.to_string()))?;
        entry.rendered_markup = markup.to_string();
        let updated = entry.clone();
        self.save_entries(&entries)?;
        tracing::debug!(%key, "updated markup");
        Ok(updated)
    }

    fn load_collection<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(raw) = self.backend.read(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is corrupt, starting empty");
                Ok(T::default())
            }
        }
    }
}
