use crate::config::JournalConfig;
use crate::error::{JournalError, Result};
use crate::model::{EntryKey, Passage, SavedEntry};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub mod add;
pub mod config;
pub mod export;
pub mod helpers;
pub mod highlight;
pub mod list;
pub mod note;
pub mod remove;
pub mod render;

/// Picks an entry either by its 1-based position in the journal or by its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySelector {
    Index(usize),
    Key(EntryKey),
}

impl FromStr for EntrySelector {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('#');
        if trimmed.is_empty() {
            return Err(JournalError::Api("Empty entry selector".to_string()));
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return match trimmed.parse::<usize>() {
                Ok(0) | Err(_) => Err(JournalError::Api(format!("Invalid entry index: {}", s))),
                Ok(n) => Ok(EntrySelector::Index(n)),
            };
        }
        Ok(EntrySelector::Key(EntryKey::from(s.trim())))
    }
}

impl fmt::Display for EntrySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySelector::Index(n) => write!(f, "#{}", n),
            EntrySelector::Key(key) => write!(f, "{}", key),
        }
    }
}

/// An entry as listed: its position in the journal and its note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub index: usize,
    pub entry: SavedEntry,
    pub note: Option<String>,
}

impl DisplayEntry {
    pub fn key(&self) -> EntryKey {
        self.entry.key()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<SavedEntry>,
    pub listed_entries: Vec<DisplayEntry>,
    pub passage: Option<Passage>,
    pub config: Option<JournalConfig>,
    pub html: Option<String>,
    pub output_path: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_entries(mut self, entries: Vec<SavedEntry>) -> Self {
        self.affected_entries = entries;
        self
    }

    pub fn with_listed_entries(mut self, entries: Vec<DisplayEntry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn with_passage(mut self, passage: Passage) -> Self {
        self.passage = Some(passage);
        self
    }

    pub fn with_config(mut self, config: JournalConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_html(mut self, html: String) -> Self {
        self.html = Some(html);
        self
    }

    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }
}
