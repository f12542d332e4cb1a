use crate::commands::{CmdResult, EntrySelector};
use crate::error::Result;
use crate::store::{JournalStore, StorageBackend};

use super::helpers::{entries_by_selectors, indexed_entries};

pub fn run<B: StorageBackend>(store: &JournalStore<B>) -> Result<CmdResult> {
    let entries = indexed_entries(store)?;
    Ok(CmdResult::default().with_listed_entries(entries))
}

/// Lists only the selected entries, in the order they were asked for.
pub fn view<B: StorageBackend>(
    store: &JournalStore<B>,
    selectors: &[EntrySelector],
) -> Result<CmdResult> {
    let entries = entries_by_selectors(store, selectors)?;
    Ok(CmdResult::default().with_listed_entries(entries))
}
