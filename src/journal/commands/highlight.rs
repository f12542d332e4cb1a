use crate::commands::{CmdMessage, CmdResult, EntrySelector};
use crate::error::{JournalError, Result};
use crate::highlight::{self, Palette, ScopedSelection, Selection, ToggleOutcome};
use crate::markup::Document;
use crate::model::{EntryKey, SavedEntry};
use crate::store::{JournalStore, StorageBackend};
use std::ops::Range;

use super::helpers::resolve_selector;

/// Toggles a highlight over the selection inside the entry `container`.
///
/// `color` is a palette swatch name or one of the palette's hex values.
pub fn toggle<B: StorageBackend>(
    store: &JournalStore<B>,
    palette: &Palette,
    container: &EntryKey,
    selection: &ScopedSelection,
    color: &str,
) -> Result<CmdResult> {
    let selection = selection.within(container)?;
    let color = palette.resolve(color)?;
    let (entry, doc) = load_document(store, container)?;

    let (doc, outcome) = highlight::toggle_highlight(&doc, selection, &color)?;
    let updated = store.update_markup(container, &doc.to_markup())?;

    let verb = match outcome {
        ToggleOutcome::Added => "Highlighted",
        ToggleOutcome::Removed => "Removed highlight in",
        ToggleOutcome::Recolored => "Recolored highlight in",
    };
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} {}",
        verb, entry.source.reference
    )));
    Ok(result.with_affected_entries(vec![updated]))
}

/// Removes every highlight touching the selection. Nothing is written when no
/// highlight is touched.
pub fn clear_selection<B: StorageBackend>(
    store: &JournalStore<B>,
    container: &EntryKey,
    selection: &ScopedSelection,
) -> Result<CmdResult> {
    let selection = selection.within(container)?;
    let (entry, doc) = load_document(store, container)?;

    let (doc, removed) = highlight::clear_selection_highlights(&doc, selection)?;
    let mut result = CmdResult::default();
    if removed == 0 {
        result.add_message(CmdMessage::info(format!(
            "No highlights in the selection of {}",
            entry.source.reference
        )));
        return Ok(result);
    }

    let updated = store.update_markup(container, &doc.to_markup())?;
    result.add_message(CmdMessage::success(format!(
        "Cleared {} highlight(s) in {}",
        removed, entry.source.reference
    )));
    Ok(result.with_affected_entries(vec![updated]))
}

/// Removes every highlight in the entry. Always writes, even with none present.
pub fn clear_all<B: StorageBackend>(
    store: &JournalStore<B>,
    container: &EntryKey,
) -> Result<CmdResult> {
    let (entry, doc) = load_document(store, container)?;

    let (doc, removed) = highlight::clear_all_highlights(&doc);
    let updated = store.update_markup(container, &doc.to_markup())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Cleared {} highlight(s) in {}",
        removed, entry.source.reference
    )));
    Ok(result.with_affected_entries(vec![updated]))
}

/// Selects the `occurrence`-th (1-based) match of `needle` in an entry's visible text.
pub fn select_text<B: StorageBackend>(
    store: &JournalStore<B>,
    selector: &EntrySelector,
    needle: &str,
    occurrence: usize,
) -> Result<ScopedSelection> {
    let target = resolve_selector(store, selector)?;
    let doc = Document::parse(&target.entry.rendered_markup)?;
    let text = doc.text_content();

    if needle.is_empty() || occurrence == 0 {
        return Err(JournalError::NoSelection);
    }
    let byte = text
        .match_indices(needle)
        .nth(occurrence - 1)
        .map(|(byte, _)| byte)
        .ok_or(JournalError::NoSelection)?;

    let start = text[..byte].chars().count();
    let range = start..start + needle.chars().count();
    Ok(ScopedSelection::new(
        target.key(),
        Selection::from_text_range(&doc, range),
    ))
}

/// Selects char offsets `range` of an entry's visible text.
pub fn select_range<B: StorageBackend>(
    store: &JournalStore<B>,
    selector: &EntrySelector,
    range: Range<usize>,
) -> Result<ScopedSelection> {
    let target = resolve_selector(store, selector)?;
    let doc = Document::parse(&target.entry.rendered_markup)?;
    Ok(ScopedSelection::new(
        target.key(),
        Selection::from_text_range(&doc, range),
    ))
}

fn load_document<B: StorageBackend>(
    store: &JournalStore<B>,
    key: &EntryKey,
) -> Result<(SavedEntry, Document)> {
    let entry = store
        .find_entry(key)?
        .ok_or_else(|| JournalError::EntryNotFound(key.to_string()))?;
    let doc = Document::parse(&entry.rendered_markup)?;
    Ok((entry, doc))
}
