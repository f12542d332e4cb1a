use crate::error::Result;

/// Durable string key/value storage.
///
/// This trait handles the "how" of persistence (filesystem vs memory), while
/// [`super::JournalStore`] handles the "what" (entries, notes, decoding).
/// Values are whole JSON documents; there are no partial writes.
pub trait StorageBackend {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
