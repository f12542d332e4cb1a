use crate::commands::{CmdMessage, CmdResult, EntrySelector};
use crate::error::Result;
use crate::store::{JournalStore, StorageBackend};

use super::helpers::resolve_selector;

/// Stores the note for one entry. Surrounding whitespace is dropped; an empty note
/// is kept as empty.
pub fn run<B: StorageBackend>(
    store: &JournalStore<B>,
    selector: &EntrySelector,
    text: &str,
) -> Result<CmdResult> {
    let mut target = resolve_selector(store, selector)?;
    let saved = store.set_note(&target.key(), text)?;
    target.note = Some(saved);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Saved!"));
    Ok(result.with_listed_entries(vec![target]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::make_key;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn saves_trimmed_note() {
        let fixture = StoreFixture::new().with_verses(2);
        let result = run(&fixture.store, &EntrySelector::Index(2), "\n  hold fast  ").unwrap();

        assert_eq!(result.listed_entries[0].note.as_deref(), Some("hold fast"));
        assert_eq!(result.messages[0].content, "Saved!");
        assert_eq!(
            fixture
                .store
                .note(&make_key("Book of Mormon", "1 Nephi 3:2"))
                .unwrap()
                .as_deref(),
            Some("hold fast")
        );
    }

    #[test]
    fn note_for_unknown_entry_fails() {
        let fixture = StoreFixture::new();
        assert!(run(&fixture.store, &EntrySelector::Index(1), "x").is_err());
        assert!(fixture.store.load_notes().unwrap().is_empty());
    }
}
