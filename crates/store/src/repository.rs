//! Pluggable persistence for judged hooks.
//!
//! The store only ever needs whole-collection load/save: the collection is
//! bounded at fifty one-line records, so a single JSON document is the
//! durable format and anything fancier (embedded db, remote kv) can slot in
//! behind the same trait.

use async_trait::async_trait;
use hookrank_core::PreferenceRecord;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
  #[error("Serialize: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Durable home for the judged-hook collection.
///
/// `load` never fails: a missing or unparseable value is an empty store,
/// not an error.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
  async fn load(&self) -> Vec<PreferenceRecord>;
  async fn save(&self, records: &[PreferenceRecord]) -> Result<(), RepositoryError>;
}

/// One JSON document on disk, written atomically (temp file + rename).
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
  path: PathBuf,
}

impl JsonFileRepository {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl PreferenceRepository for JsonFileRepository {
  async fn load(&self) -> Vec<PreferenceRecord> {
    let content = match tokio::fs::read_to_string(&self.path).await {
      Ok(content) => content,
      Err(e) => {
        debug!("No preference file at {:?} ({}), starting empty", self.path, e);
        return Vec::new();
      }
    };

    match serde_json::from_str(&content) {
      Ok(records) => records,
      Err(e) => {
        warn!("Preference file at {:?} is corrupt ({}), starting empty", self.path, e);
        Vec::new()
      }
    }
  }

  async fn save(&self, records: &[PreferenceRecord]) -> Result<(), RepositoryError> {
    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string(records)?;

    // Write-then-rename so an interrupted save can never corrupt the file
    let tmp = self.path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, &self.path).await?;

    debug!("Saved {} preference records to {:?}", records.len(), self.path);
    Ok(())
  }
}

/// In-process repository for tests and ephemeral preference profiles.
#[derive(Debug, Default)]
pub struct MemoryRepository {
  records: Mutex<Vec<PreferenceRecord>>,
}

impl MemoryRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl PreferenceRepository for MemoryRepository {
  async fn load(&self) -> Vec<PreferenceRecord> {
    self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
  }

  async fn save(&self, records: &[PreferenceRecord]) -> Result<(), RepositoryError> {
    *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records.to_vec();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(text: &str, ts: i64) -> PreferenceRecord {
    PreferenceRecord::new(text, vec![1.0, 0.0], true, ts)
  }

  #[tokio::test]
  async fn test_missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("preferences.json"));

    assert!(repo.load().await.is_empty());
  }

  #[tokio::test]
  async fn test_save_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("preferences.json"));

    repo.save(&[record("a", 1), record("b", 2)]).await.unwrap();

    let loaded = repo.load().await;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].text, "a");
    assert_eq!(loaded[1].timestamp, 2);
  }

  #[tokio::test]
  async fn test_corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let repo = JsonFileRepository::new(&path);
    assert!(repo.load().await.is_empty());
  }

  #[tokio::test]
  async fn test_save_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("nested/deeper/preferences.json"));

    repo.save(&[record("a", 1)]).await.unwrap();
    assert_eq!(repo.load().await.len(), 1);
  }

  #[tokio::test]
  async fn test_save_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let repo = JsonFileRepository::new(&path);

    repo.save(&[record("a", 1)]).await.unwrap();

    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
      names.push(entry.file_name());
    }
    assert_eq!(names, vec![std::ffi::OsString::from("preferences.json")]);
  }

  #[tokio::test]
  async fn test_memory_repository_roundtrip() {
    let repo = MemoryRepository::new();
    assert!(repo.load().await.is_empty());

    repo.save(&[record("a", 1)]).await.unwrap();
    assert_eq!(repo.load().await.len(), 1);
  }
}
