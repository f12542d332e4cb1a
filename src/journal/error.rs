use crate::model::EntryKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Already saved: {0}")]
    DuplicateEntry(EntryKey),

    #[error("Select some text in the passage first")]
    NoSelection,

    #[error("The selection must be inside this passage")]
    SelectionOutsideScope,

    #[error("Select text within a single verse or line, without crossing another highlight")]
    UnwrappableSelection,

    #[error("Unknown highlight color: {0}")]
    InvalidColor(String),

    #[error("Removal cancelled")]
    ConfirmationDeclined,

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl JournalError {
    /// Selection preconditions that are shown to the user as a notice and retried,
    /// rather than treated as failures.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            JournalError::NoSelection
                | JournalError::SelectionOutsideScope
                | JournalError::UnwrappableSelection
        )
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
