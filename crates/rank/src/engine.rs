//! Candidate scoring against the judged-hook memory.
//!
//! A candidate's score is the sum of signed cosine similarities against
//! every record: liked records pull it up, disliked records push it down.
//! Summation (not mean) is deliberate: resembling many liked hooks beats
//! resembling a single one, and the window is bounded at fifty records so
//! the magnitude stays bounded too.

use embedding::EmbeddingProvider;
use hookrank_core::CandidateScore;
use std::sync::Arc;
use store::PreferenceStore;
use tracing::{debug, warn};

/// Calculate cosine similarity between two embeddings.
///
/// Defined as 0.0 when the lengths differ or either vector has zero norm,
/// so degenerate embeddings can never produce NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() {
    return 0.0;
  }

  let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
  let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

  if norm_a == 0.0 || norm_b == 0.0 {
    return 0.0;
  }

  dot_product / (norm_a * norm_b)
}

/// Orders candidate hooks by estimated alignment with learned preference.
///
/// Read-only over the store; the returned order is a pure function of the
/// store contents at the moment the call began.
pub struct RankEngine {
  provider: Arc<dyn EmbeddingProvider>,
}

impl RankEngine {
  pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
    Self { provider }
  }

  /// Rank candidates by score descending; ties keep input order.
  ///
  /// With no judged hooks there is nothing to rank on and every candidate
  /// gets the neutral score in input order. The same fallback covers a
  /// failed batch embedding call: ranking degrades, it never raises.
  pub async fn rank(&self, store: &PreferenceStore, candidates: &[String]) -> Vec<CandidateScore> {
    if candidates.is_empty() {
      return Vec::new();
    }

    let records = store.all_records().await;
    if records.is_empty() {
      debug!("No preference records; returning neutral scores");
      return neutral(candidates);
    }

    let texts: Vec<&str> = candidates.iter().map(|s| s.as_str()).collect();
    let embeddings = match self.provider.embed_batch(&texts).await {
      Ok(embeddings) => embeddings,
      Err(e) => {
        warn!("Candidate embedding failed ({}); returning neutral scores", e);
        return neutral(candidates);
      }
    };

    // All-or-nothing: a short response means partial results, which are
    // never scored.
    if embeddings.len() != candidates.len() {
      warn!(
        "Got {} embeddings for {} candidates; returning neutral scores",
        embeddings.len(),
        candidates.len()
      );
      return neutral(candidates);
    }

    let mut scored: Vec<CandidateScore> = candidates
      .iter()
      .zip(embeddings.iter())
      .map(|(text, candidate)| {
        let score: f32 = records
          .iter()
          .map(|r| r.sign() * cosine_similarity(candidate, &r.embedding))
          .sum();
        CandidateScore::new(text.clone(), score)
      })
      .collect();

    // Vec::sort_by is stable, so ties keep input order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    debug!(
      "Ranked {} candidates against {} records (top score {:.3})",
      scored.len(),
      records.len(),
      scored[0].score
    );
    scored
  }
}

fn neutral(candidates: &[String]) -> Vec<CandidateScore> {
  candidates.iter().map(CandidateScore::neutral).collect()
}
