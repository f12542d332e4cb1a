use crate::commands::{CmdMessage, CmdResult, EntrySelector};
use crate::error::Result;
use crate::store::{JournalStore, StorageBackend};

use super::helpers::entries_by_selectors;

/// Removes the selected entries and their notes.
///
/// All selectors are resolved before anything is removed, so a bad selector leaves
/// the journal untouched.
pub fn run<B: StorageBackend>(
    store: &JournalStore<B>,
    selectors: &[EntrySelector],
) -> Result<CmdResult> {
    let targets = entries_by_selectors(store, selectors)?;
    let mut result = CmdResult::default();

    for target in targets {
        let key = target.key();
        if let Some(removed) = store.remove_entry(&key)? {
            result.add_message(CmdMessage::success(format!(
                "Removed #{}: {}",
                target.index, removed.source.reference
            )));
            result.affected_entries.push(removed);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;
    use crate::model::make_key;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn removes_entry_and_note() {
        let fixture = StoreFixture::new()
            .with_verses(2)
            .with_note("Book of Mormon|1 Nephi 3:1", "first");

        let result = run(&fixture.store, &[EntrySelector::Index(1)]).unwrap();
        assert_eq!(result.affected_entries.len(), 1);

        let notes = fixture.store.load_notes().unwrap();
        assert!(!notes.contains_key(&make_key("Book of Mormon", "1 Nephi 3:1")));
        assert_eq!(fixture.store.load_entries().unwrap().len(), 1);
    }

    #[test]
    fn indexes_refer_to_the_listing_before_removal() {
        let fixture = StoreFixture::new().with_verses(3);
        run(
            &fixture.store,
            &[EntrySelector::Index(1), EntrySelector::Index(3)],
        )
        .unwrap();

        let left = fixture.store.load_entries().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].source.reference, "1 Nephi 3:2");
    }

    #[test]
    fn bad_selector_removes_nothing() {
        let fixture = StoreFixture::new().with_verses(2);
        let result = run(
            &fixture.store,
            &[EntrySelector::Index(1), EntrySelector::Index(9)],
        );
        assert!(matches!(result, Err(JournalError::EntryNotFound(_))));
        assert_eq!(fixture.store.load_entries().unwrap().len(), 2);
    }
}
