//! # Journal View Controller
//!
//! Holds the state of the journal screen: one [`EntryCard`] per saved entry, each with
//! its passage markup, note, note-editor visibility and transient status text.
//!
//! Every action reports what it changed through [`ViewUpdate`]:
//!
//! - adding or removing an entry rebuilds every card ([`ViewUpdate::Full`])
//! - note and highlight edits touch one card ([`ViewUpdate::Entry`])
//! - declined or failed preconditions change nothing ([`ViewUpdate::Unchanged`])
//!
//! Blocking interaction is delegated to a [`Prompt`]: removal asks for confirmation,
//! and a selection problem (nothing selected, selection in another passage, selection
//! that cannot be wrapped) is shown as a notice rather than returned as an error.

use crate::api::JournalApi;
use crate::commands::render::{render_page, safe_markup, PageCard, EMPTY_MESSAGE};
use crate::commands::{CmdResult, DisplayEntry};
use crate::error::{JournalError, Result};
use crate::highlight::ScopedSelection;
use crate::model::{EntryKey, Passage, SavedEntry};
use crate::store::StorageBackend;

pub const REMOVE_CONFIRMATION: &str = "Remove this scripture from your journal?";
pub const NOTE_SAVED: &str = "Saved!";

/// Blocking confirmation and notification hooks.
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Full,
    Entry(EntryKey),
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCard {
    pub index: usize,
    pub key: EntryKey,
    pub reference: String,
    pub collection: String,
    pub markup: String,
    pub plain_text: String,
    pub note: String,
    pub note_visible: bool,
    pub status: Option<String>,
}

impl EntryCard {
    fn from_display(de: DisplayEntry) -> Self {
        Self {
            index: de.index,
            key: de.entry.key(),
            reference: de.entry.source.reference,
            collection: de.entry.source.collection,
            markup: de.entry.rendered_markup,
            plain_text: de.entry.plain_text,
            note: de.note.unwrap_or_default(),
            note_visible: false,
            status: None,
        }
    }

    /// `#N reference (collection)`
    pub fn reference_line(&self) -> String {
        format!("#{} {} ({})", self.index, self.reference, self.collection)
    }

    pub fn note_toggle_label(&self) -> &'static str {
        if self.note_visible {
            "Hide Journal ▲"
        } else {
            "Add Journal ▸"
        }
    }

    fn page_card(&self) -> PageCard {
        PageCard {
            index: self.index,
            key: self.key.to_string(),
            reference: self.reference.clone(),
            collection: self.collection.clone(),
            markup: safe_markup(&self.markup, &self.plain_text),
            note: self.note.clone(),
            note_visible: self.note_visible,
            status: self.status.clone(),
        }
    }
}

pub struct JournalView<B: StorageBackend, P: Prompt> {
    api: JournalApi<B>,
    prompt: P,
    cards: Vec<EntryCard>,
}

impl<B: StorageBackend, P: Prompt> JournalView<B, P> {
    pub fn new(api: JournalApi<B>, prompt: P) -> Result<Self> {
        let mut view = Self {
            api,
            prompt,
            cards: Vec::new(),
        };
        view.refresh()?;
        Ok(view)
    }

    pub fn api(&self) -> &JournalApi<B> {
        &self.api
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn cards(&self) -> &[EntryCard] {
        &self.cards
    }

    pub fn card(&self, key: &EntryKey) -> Option<&EntryCard> {
        self.cards.iter().find(|c| &c.key == key)
    }

    /// Message shown in place of the list when the journal is empty.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.cards.is_empty().then_some(EMPTY_MESSAGE)
    }

    /// Rebuilds every card from storage. Note editors start hidden.
    pub fn refresh(&mut self) -> Result<()> {
        let listed = self.api.list_entries()?.listed_entries;
        self.cards = listed.into_iter().map(EntryCard::from_display).collect();
        Ok(())
    }

    /// Saves a passage. Returns the status text to show next to it.
    pub fn add(&mut self, passage: Passage) -> Result<(ViewUpdate, String)> {
        let result = self.api.add_passage(passage)?;
        let status = first_message(&result);
        if result.affected_entries.is_empty() {
            return Ok((ViewUpdate::Unchanged, status));
        }
        self.refresh()?;
        Ok((ViewUpdate::Full, status))
    }

    /// Asks for confirmation, then removes the entry and its note.
    pub fn remove(&mut self, key: &EntryKey) -> Result<ViewUpdate> {
        self.require_card(key)?;
        if !self.prompt.confirm(REMOVE_CONFIRMATION) {
            tracing::debug!(%key, "removal declined");
            return Err(JournalError::ConfirmationDeclined);
        }
        self.api.remove_entries(&[key.as_str()])?;
        self.refresh()?;
        Ok(ViewUpdate::Full)
    }

    pub fn toggle_note_editor(&mut self, key: &EntryKey) -> Result<ViewUpdate> {
        let card = self.card_mut(key)?;
        card.note_visible = !card.note_visible;
        Ok(ViewUpdate::Entry(key.clone()))
    }

    pub fn save_note(&mut self, key: &EntryKey, text: &str) -> Result<ViewUpdate> {
        let result = self.api.set_note(key.as_str(), text)?;
        let saved = result
            .listed_entries
            .into_iter()
            .next()
            .and_then(|de| de.note)
            .unwrap_or_default();

        let card = self.card_mut(key)?;
        card.note = saved;
        card.status = Some(NOTE_SAVED.to_string());
        Ok(ViewUpdate::Entry(key.clone()))
    }

    /// Drops the transient status text of one card.
    pub fn clear_status(&mut self, key: &EntryKey) -> Result<ViewUpdate> {
        let card = self.card_mut(key)?;
        if card.status.take().is_none() {
            return Ok(ViewUpdate::Unchanged);
        }
        Ok(ViewUpdate::Entry(key.clone()))
    }

    pub fn toggle_highlight(
        &mut self,
        key: &EntryKey,
        selection: &ScopedSelection,
        color: &str,
    ) -> Result<ViewUpdate> {
        let outcome = self.api.toggle_highlight(key, selection, color);
        self.apply_markup_change(key, outcome)
    }

    pub fn clear_selection_highlights(
        &mut self,
        key: &EntryKey,
        selection: &ScopedSelection,
    ) -> Result<ViewUpdate> {
        let outcome = self.api.clear_selection_highlights(key, selection);
        self.apply_markup_change(key, outcome)
    }

    pub fn clear_all_highlights(&mut self, key: &EntryKey) -> Result<ViewUpdate> {
        let outcome = self.api.clear_all_highlights(key);
        self.apply_markup_change(key, outcome)
    }

    /// The journal page as HTML, with the current note visibility and status text.
    pub fn render_html(&self) -> Result<String> {
        let cards: Vec<PageCard> = self.cards.iter().map(EntryCard::page_card).collect();
        render_page(&cards, self.api.palette())
    }

    fn apply_markup_change(
        &mut self,
        key: &EntryKey,
        outcome: Result<CmdResult>,
    ) -> Result<ViewUpdate> {
        let result = match outcome {
            Ok(result) => result,
            Err(err) if err.is_notice() => {
                self.prompt.notify(&err.to_string());
                return Ok(ViewUpdate::Unchanged);
            }
            Err(err) => return Err(err),
        };

        let Some(updated) = result.affected_entries.into_iter().next() else {
            return Ok(ViewUpdate::Unchanged);
        };
        self.update_card(key, &updated)?;
        Ok(ViewUpdate::Entry(key.clone()))
    }

    fn update_card(&mut self, key: &EntryKey, entry: &SavedEntry) -> Result<()> {
        let card = self.card_mut(key)?;
        card.markup = entry.rendered_markup.clone();
        Ok(())
    }

    fn require_card(&self, key: &EntryKey) -> Result<&EntryCard> {
        self.card(key)
            .ok_or_else(|| JournalError::EntryNotFound(key.to_string()))
    }

    fn card_mut(&mut self, key: &EntryKey) -> Result<&mut EntryCard> {
        self.cards
            .iter_mut()
            .find(|c| &c.key == key)
            .ok_or_else(|| JournalError::EntryNotFound(key.to_string()))
    }
}

fn first_message(result: &CmdResult) -> String {
    result
        .messages
        .first()
        .map(|m| m.content.clone())
        .unwrap_or_default()
}
