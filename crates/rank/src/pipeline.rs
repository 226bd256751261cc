//! The end-to-end selection cycle: generate candidates, rank them against
//! learned preference, fold recent likes into a style hint, and produce
//! the final script.
//!
//! Only two failures are fatal: no candidates, and a failed final
//! generation call. Everything in between degrades to a neutral or empty
//! signal so a flaky embedding backend never blocks the creative flow.

use hookrank_core::{DEFAULT_CANDIDATE_COUNT, DEFAULT_STYLE_HINT_LIMIT};
use llm::{CreativeBrief, HookGenerator, LlmError, Script};
use std::sync::Arc;
use store::PreferenceStore;
use tracing::{debug, info};

use crate::engine::RankEngine;
use crate::summary::style_hint;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
  #[error("Candidate generation failed: {0}")]
  CandidateGeneration(#[source] LlmError),
  #[error("Generator returned no candidates")]
  NoCandidates,
  #[error("Script generation failed: {0}")]
  ScriptGeneration(#[source] LlmError),
}

/// Drives one selection cycle per `run` call. Holds no per-run state.
pub struct HookPipeline {
  generator: Arc<dyn HookGenerator>,
  engine: RankEngine,
  candidate_count: usize,
  style_hint_limit: usize,
}

impl HookPipeline {
  pub fn new(generator: Arc<dyn HookGenerator>, engine: RankEngine) -> Self {
    Self {
      generator,
      engine,
      candidate_count: DEFAULT_CANDIDATE_COUNT,
      style_hint_limit: DEFAULT_STYLE_HINT_LIMIT,
    }
  }

  pub fn with_candidate_count(mut self, count: usize) -> Self {
    self.candidate_count = count.max(1);
    self
  }

  pub fn with_style_hint_limit(mut self, limit: usize) -> Self {
    self.style_hint_limit = limit;
    self
  }

  /// Run one full cycle: candidates -> ranking -> style hint -> script.
  pub async fn run(&self, store: &PreferenceStore, brief: &CreativeBrief) -> Result<Script, PipelineError> {
    let candidates = self
      .generator
      .generate_hooks(brief, None, self.candidate_count)
      .await
      .map_err(PipelineError::CandidateGeneration)?;

    if candidates.is_empty() {
      return Err(PipelineError::NoCandidates);
    }
    debug!("Generated {} candidate hooks", candidates.len());

    // Never fails: degrades to neutral scores, where the first candidate
    // in generation order wins.
    let ranked = self.engine.rank(store, &candidates).await;
    let selected = &ranked[0];
    info!("Selected hook (score {:.3}): {:?}", selected.score, selected.text);

    let hint = style_hint(store, self.style_hint_limit).await;
    let hint = if hint.is_empty() { None } else { Some(hint) };

    let script = self
      .generator
      .generate_script(brief, &selected.text, hint.as_deref())
      .await
      .map_err(PipelineError::ScriptGeneration)?;

    info!("Generated script with {} scenes", script.scenes.len());
    Ok(script)
  }
}
