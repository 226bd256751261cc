//! Bounded, persisted record of judged hooks.
//!
//! The store is the only mutable state in the engine. Judgments are a
//! best-effort learning signal: an embedding or persistence failure drops
//! the judgment and leaves the previous state untouched, so a flaky
//! backend can never block the creative flow.

use embedding::EmbeddingProvider;
use hookrank_core::{MAX_MEMORY_LIMIT, PreferenceRecord};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::repository::PreferenceRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Judged text must not be empty")]
  EmptyText,
  #[error("Repository: {0}")]
  Repository(#[from] crate::repository::RepositoryError),
}

/// Rolling-window memory of approved and rejected hooks.
///
/// Invariants:
/// - at most one record per distinct text (re-judging overwrites in place);
/// - never more than `limit` records; oldest-by-timestamp evicted first;
/// - records are held sorted by timestamp ascending.
pub struct PreferenceStore {
  provider: Arc<dyn EmbeddingProvider>,
  repository: Box<dyn PreferenceRepository>,
  records: Mutex<Vec<PreferenceRecord>>,
  limit: usize,
}

impl PreferenceStore {
  /// Open a store, loading and sanitizing whatever the repository holds.
  pub async fn open(repository: Box<dyn PreferenceRepository>, provider: Arc<dyn EmbeddingProvider>) -> Self {
    Self::open_with_limit(repository, provider, MAX_MEMORY_LIMIT).await
  }

  pub async fn open_with_limit(
    repository: Box<dyn PreferenceRepository>,
    provider: Arc<dyn EmbeddingProvider>,
    limit: usize,
  ) -> Self {
    let mut records = repository.load().await;
    sanitize(&mut records, limit);
    debug!("Opened preference store with {} records", records.len());

    Self {
      provider,
      repository,
      records: Mutex::new(records),
      limit,
    }
  }

  /// Record a user judgment on a hook.
  ///
  /// The embedding is recomputed every time, even when the text was judged
  /// before, so stored vectors track embedding-model drift. Provider or
  /// persistence failures are logged and swallowed; only an empty text is
  /// rejected outright.
  pub async fn record_judgment(&self, text: &str, liked: bool) -> Result<(), StoreError> {
    if text.trim().is_empty() {
      return Err(StoreError::EmptyText);
    }

    let embedding = match self.provider.embed(text).await {
      Ok(embedding) => embedding,
      Err(e) => {
        warn!("Dropping judgment for {:?}: embedding failed: {}", text, e);
        return Ok(());
      }
    };

    let mut records = self.records.lock().await;

    // Stage the mutation; commit only after the save lands, so an aborted
    // write leaves the previous state intact.
    let mut staged = records.clone();
    let timestamp = next_timestamp(&staged);
    staged.retain(|r| r.text != text);
    staged.push(PreferenceRecord::new(text, embedding, liked, timestamp));
    while staged.len() > self.limit {
      staged.remove(0);
    }

    if let Err(e) = self.repository.save(&staged).await {
      warn!("Dropping judgment for {:?}: persistence failed: {}", text, e);
      return Ok(());
    }

    debug!(
      "Recorded judgment liked={} for {:?} ({} records)",
      liked,
      text,
      staged.len()
    );
    *records = staged;
    Ok(())
  }

  /// Every record, oldest first.
  pub async fn all_records(&self) -> Vec<PreferenceRecord> {
    self.records.lock().await.clone()
  }

  /// The most recently liked hooks, newest first.
  pub async fn recent_liked(&self, limit: usize) -> Vec<PreferenceRecord> {
    let records = self.records.lock().await;
    records.iter().rev().filter(|r| r.liked).take(limit).cloned().collect()
  }

  /// Forget every judgment ("reset my preferences").
  pub async fn reset(&self) -> Result<(), StoreError> {
    let mut records = self.records.lock().await;
    self.repository.save(&[]).await?;
    records.clear();
    debug!("Preference store reset");
    Ok(())
  }

  pub async fn len(&self) -> usize {
    self.records.lock().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.records.lock().await.is_empty()
  }
}

/// Re-establish the store invariants on whatever was loaded: sorted by
/// timestamp, one record per text (newest wins), bounded.
fn sanitize(records: &mut Vec<PreferenceRecord>, limit: usize) {
  records.sort_by_key(|r| r.timestamp);

  let mut seen = std::collections::HashSet::new();
  // Walk newest-to-oldest so the latest judgment for a text survives
  for i in (0..records.len()).rev() {
    if !seen.insert(records[i].text.clone()) {
      records.remove(i);
    }
  }

  if records.len() > limit {
    let excess = records.len() - limit;
    records.drain(..excess);
  }
}

fn next_timestamp(records: &[PreferenceRecord]) -> i64 {
  let now = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as i64)
    .unwrap_or(0);
  let last = records.iter().map(|r| r.timestamp).max().unwrap_or(i64::MIN);
  now.max(last.saturating_add(1))
}
