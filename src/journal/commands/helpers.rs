use super::{DisplayEntry, EntrySelector};
use crate::error::{JournalError, Result};
use crate::store::{JournalStore, StorageBackend};

/// All entries in save order, numbered from 1, with their notes attached.
pub fn indexed_entries<B: StorageBackend>(store: &JournalStore<B>) -> Result<Vec<DisplayEntry>> {
    let entries = store.load_entries()?;
    let mut notes = store.load_notes()?;

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let note = notes.remove(&entry.key());
            DisplayEntry {
                index: i + 1,
                entry,
                note,
            }
        })
        .collect())
}

pub fn resolve_selector<B: StorageBackend>(
    store: &JournalStore<B>,
    selector: &EntrySelector,
) -> Result<DisplayEntry> {
    let mut matches = entries_by_selectors(store, std::slice::from_ref(selector))?;
    matches
        .pop()
        .ok_or_else(|| JournalError::EntryNotFound(selector.to_string()))
}

pub fn entries_by_selectors<B: StorageBackend>(
    store: &JournalStore<B>,
    selectors: &[EntrySelector],
) -> Result<Vec<DisplayEntry>> {
    let indexed = indexed_entries(store)?;

    selectors
        .iter()
        .map(|selector| {
            indexed
                .iter()
                .find(|de| match selector {
                    EntrySelector::Index(n) => de.index == *n,
                    EntrySelector::Key(key) => &de.key() == key,
                })
                .cloned()
                .ok_or_else(|| JournalError::EntryNotFound(selector.to_string()))
        })
        .collect()
}
