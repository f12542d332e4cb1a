use crate::commands::{CmdMessage, CmdResult};
use crate::error::{JournalError, Result};
use crate::model::{Passage, SavedEntry};
use crate::store::{JournalStore, StorageBackend};
use chrono::Utc;

/// Saves a passage to the journal. Saving one that is already there is reported,
/// not failed.
pub fn run<B: StorageBackend>(store: &JournalStore<B>, passage: Passage) -> Result<CmdResult> {
    let entry = SavedEntry::from_passage(passage, Utc::now());
    let reference = entry.source.reference.clone();
    let mut result = CmdResult::default();

    match store.add_entry(entry.clone()) {
        Ok(()) => {
            result.add_message(CmdMessage::success(format!(
                "Added to Journal: {}",
                reference
            )));
            Ok(result.with_affected_entries(vec![entry]))
        }
        Err(JournalError::DuplicateEntry(_)) => {
            result.add_message(CmdMessage::info(format!("Already saved: {}", reference)));
            Ok(result)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::{verse_passage, StoreFixture};

    fn courage() -> Passage {
        verse_passage("Book of Mormon", "1 Nephi 3:7", 7, "I will go and do")
    }

    #[test]
    fn adds_new_entry() {
        let fixture = StoreFixture::new();
        let result = run(&fixture.store, courage()).unwrap();

        assert_eq!(result.affected_entries.len(), 1);
        assert!(result.affected_entries[0].saved_at.is_some());
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(fixture.store.load_entries().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_is_reported_without_change() {
        let fixture = StoreFixture::new();
        run(&fixture.store, courage()).unwrap();
        let again = run(&fixture.store, courage()).unwrap();

        assert!(again.affected_entries.is_empty());
        assert_eq!(again.messages[0].level, MessageLevel::Info);
        assert!(again.messages[0].content.contains("Already saved"));
        assert_eq!(fixture.store.load_entries().unwrap().len(), 1);
    }

    #[test]
    fn keeps_supplied_markup() {
        let fixture = StoreFixture::new();
        let mut passage = courage();
        passage.rendered_markup = Some("<p><span class=\"verse-num\">7</span> I will go</p>".into());
        run(&fixture.store, passage).unwrap();

        let stored = fixture.store.load_entries().unwrap();
        assert_eq!(
            stored[0].rendered_markup,
            "<p><span class=\"verse-num\">7</span> I will go</p>"
        );
    }
}
