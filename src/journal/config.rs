use crate::error::{JournalError, Result};
use crate::highlight::Palette;
use crate::store::{StorageKeys, DEFAULT_ENTRIES_KEY, DEFAULT_NOTES_KEY};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Overrides the data directory.
pub const HOME_ENV: &str = "SCRIPTURE_JOURNAL_HOME";

/// Configuration for the journal, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalConfig {
    /// Storage key holding the saved entries
    #[serde(default = "default_entries_key")]
    pub entries_key: String,

    /// Storage key holding the notes
    #[serde(default = "default_notes_key")]
    pub notes_key: String,

    /// Colors offered for highlighting
    #[serde(default)]
    pub palette: Palette,

    /// Directory with the scripture volume files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_dir: Option<PathBuf>,
}

fn default_entries_key() -> String {
    DEFAULT_ENTRIES_KEY.to_string()
}

fn default_notes_key() -> String {
    DEFAULT_NOTES_KEY.to_string()
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            entries_key: default_entries_key(),
            notes_key: default_notes_key(),
            palette: Palette::default(),
            corpus_dir: None,
        }
    }
}

impl JournalConfig {
    pub const KEYS: [&'static str; 4] = ["entries-key", "notes-key", "palette", "corpus-dir"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            entries: self.entries_key.clone(),
            notes: self.notes_key.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "entries-key" => Some(self.entries_key.clone()),
            "notes-key" => Some(self.notes_key.clone()),
            "palette" => Some(
                self.palette
                    .swatches()
                    .iter()
                    .map(|s| format!("{}={}", s.name, s.color))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            "corpus-dir" => Some(
                self.corpus_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Only the corpus directory can be changed here; storage keys and palette are
    /// edited in the file.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "corpus-dir" => {
                let trimmed = value.trim();
                self.corpus_dir = if trimmed.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
                Ok(())
            }
            k if Self::KEYS.contains(&k) => Err(JournalError::Api(format!(
                "{} is read-only, edit {} instead",
                k, CONFIG_FILENAME
            ))),
            other => Err(JournalError::Api(format!("Unknown config key: {}", other))),
        }
    }
}

/// Resolves the data directory: `$SCRIPTURE_JOURNAL_HOME` when set, otherwise the
/// platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("org", "scripture-journal", "scripture-journal")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| JournalError::Store("Could not determine a data directory".to_string()))
}
