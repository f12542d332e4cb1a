use crate::error::{JournalError, Result};
use crate::markup::render;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between collection and reference inside an [`EntryKey`].
pub const KEY_SEPARATOR: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Verse,
    Chapter,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Verse => "verse",
            Mode::Chapter => "chapter",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verse" => Ok(Mode::Verse),
            "chapter" => Ok(Mode::Chapter),
            other => Err(JournalError::Api(format!("Unknown mode: {}", other))),
        }
    }
}

/// Where a passage comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptureRef {
    /// The volume the passage belongs to, e.g. "Book of Mormon" or "Old Testament".
    pub collection: String,
    pub book: String,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
    /// Human readable citation, e.g. "1 Nephi 3:7".
    pub reference: String,
}

impl ScriptureRef {
    pub fn key(&self) -> EntryKey {
        make_key(&self.collection, &self.reference)
    }
}

/// Identity shared by an entry and its note.
///
/// Two entries with the same collection and reference have the same key. The format
/// `collection|reference` is persisted, so it must stay as it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryKey {
    fn from(raw: &str) -> Self {
        EntryKey(raw.to_string())
    }
}

pub fn make_key(collection: &str, reference: &str) -> EntryKey {
    EntryKey(format!("{}{}{}", collection, KEY_SEPARATOR, reference))
}

/// A passage produced by the generation flow, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub source: ScriptureRef,
    pub mode: Mode,
    pub plain_text: String,
    pub rendered_markup: Option<String>,
}

impl Passage {
    pub fn key(&self) -> EntryKey {
        self.source.key()
    }

    /// Text handed to the clipboard: `text — reference`.
    pub fn clipboard_text(&self) -> String {
        format_for_clipboard(&self.plain_text, &self.source.reference)
    }
}

/// A passage saved to the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEntry {
    pub source: ScriptureRef,
    pub mode: Mode,
    /// Source text, never modified after saving.
    pub plain_text: String,
    /// Display markup, including any highlight regions.
    pub rendered_markup: String,
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedEntry {
    pub fn from_passage(passage: Passage, saved_at: DateTime<Utc>) -> Self {
        let rendered_markup = match passage.rendered_markup {
            Some(markup) if !markup.is_empty() => markup,
            _ => render::fallback_markup(passage.mode, passage.source.verse, &passage.plain_text),
        };
        Self {
            source: passage.source,
            mode: passage.mode,
            plain_text: passage.plain_text,
            rendered_markup,
            saved_at: Some(saved_at),
        }
    }

    pub fn key(&self) -> EntryKey {
        self.source.key()
    }

    pub fn clipboard_text(&self) -> String {
        format_for_clipboard(&self.plain_text, &self.source.reference)
    }
}

pub fn format_for_clipboard(text: &str, reference: &str) -> String {
    format!("{} — {}", text, reference)
}
