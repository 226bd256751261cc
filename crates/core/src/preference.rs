use serde::{Deserialize, Serialize};

/// Maximum number of judged hooks retained in the rolling window.
pub const MAX_MEMORY_LIMIT: usize = 50;

/// Score assigned to every candidate when there is no preference signal.
///
/// Deliberately not 0.0: a zero score is what a genuinely disliked candidate
/// earns, while 0.5 means "no information either way".
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Default number of hook candidates generated per selection cycle.
pub const DEFAULT_CANDIDATE_COUNT: usize = 5;

/// Default number of recent liked hooks folded into the style hint.
pub const DEFAULT_STYLE_HINT_LIMIT: usize = 3;

/// A single judged hook: the exact text the user approved or rejected,
/// its embedding at judgment time, and a store-assigned logical timestamp.
///
/// Serialized field names are part of the persisted-state contract and
/// must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRecord {
  pub text: String,
  pub embedding: Vec<f32>,
  pub liked: bool,
  /// Milliseconds; assigned monotonically by the store. Used for eviction
  /// and recency ordering only, never for correctness.
  pub timestamp: i64,
}

impl PreferenceRecord {
  pub fn new(text: impl Into<String>, embedding: Vec<f32>, liked: bool, timestamp: i64) -> Self {
    Self {
      text: text.into(),
      embedding,
      liked,
      timestamp,
    }
  }

  /// Signed contribution direction: +1 for liked, -1 for disliked.
  pub fn sign(&self) -> f32 {
    if self.liked { 1.0 } else { -1.0 }
  }
}

/// Ephemeral per-ranking-call result. Carries no identity across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
  pub text: String,
  pub score: f32,
}

impl CandidateScore {
  pub fn new(text: impl Into<String>, score: f32) -> Self {
    Self {
      text: text.into(),
      score,
    }
  }

  pub fn neutral(text: impl Into<String>) -> Self {
    Self::new(text, NEUTRAL_SCORE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_sign() {
    let liked = PreferenceRecord::new("a", vec![1.0], true, 1);
    let disliked = PreferenceRecord::new("b", vec![1.0], false, 2);

    assert_eq!(liked.sign(), 1.0);
    assert_eq!(disliked.sign(), -1.0);
  }

  #[test]
  fn test_record_serde_field_names() {
    let record = PreferenceRecord::new("hook", vec![0.5, 0.5], true, 42);
    let json = serde_json::to_value(&record).unwrap();

    // Persisted-state contract: exactly these four fields.
    assert_eq!(json["text"], "hook");
    assert_eq!(json["liked"], true);
    assert_eq!(json["timestamp"], 42);
    assert_eq!(json["embedding"].as_array().unwrap().len(), 2);
    assert_eq!(json.as_object().unwrap().len(), 4);
  }

  #[test]
  fn test_neutral_candidate() {
    let c = CandidateScore::neutral("hook");
    assert_eq!(c.score, NEUTRAL_SCORE);
  }
}
