use super::backend::StorageBackend;
use crate::error::{JournalError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Keeps each storage key in its own `<key>.json` file under one directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(JournalError::Store(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.ensure_dir()?;

        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        assert_eq!(backend.read("savedEntries").unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("nested"));
        backend.write("savedNotes", "{\"a|b\":\"note\"}").unwrap();

        assert_eq!(
            backend.read("savedNotes").unwrap().as_deref(),
            Some("{\"a|b\":\"note\"}")
        );
        assert!(dir.path().join("nested/savedNotes.json").exists());
    }

    #[test]
    fn writes_leave_no_temp_files() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        backend.write("savedEntries", "[]").unwrap();
        backend.write("savedEntries", "[1]").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["savedEntries.json".to_string()]);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        backend.write("savedNotes", "{}").unwrap();
        backend.remove("savedNotes").unwrap();
        backend.remove("savedNotes").unwrap();
        assert_eq!(backend.read("savedNotes").unwrap(), None);
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        assert!(matches!(
            backend.write("../outside", "x"),
            Err(JournalError::Store(_))
        ));
    }
}
