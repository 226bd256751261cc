use serde::{Deserialize, Serialize};

mod openrouter;
pub mod prompts;
mod provider;

pub use openrouter::OpenRouterGenerator;
pub use provider::{HookGenerator, Result};

/// The topic/analysis payload a selection cycle is generated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeBrief {
  /// Product/offer analysis the ad is built on
  pub context: String,
  /// Audience niche (e.g., "home fitness")
  pub niche: String,
  /// Requested tone (e.g., "playful", "urgent")
  pub tone: String,
}

impl CreativeBrief {
  pub fn new(context: impl Into<String>, niche: impl Into<String>, tone: impl Into<String>) -> Self {
    Self {
      context: context.into(),
      niche: niche.into(),
      tone: tone.into(),
    }
  }
}

/// One timed scene of the final ad script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptScene {
  pub start_secs: u32,
  pub end_secs: u32,
  /// Spoken/voiceover line for this scene
  pub narration: String,
  /// What is on screen while the narration plays
  pub visual: String,
}

/// The final generated artifact: a full ad script broken into timed scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
  /// The opening line; always the selected directive's realization
  pub hook: String,
  pub scenes: Vec<ScriptScene>,
  #[serde(default)]
  pub cta: Option<String>,
}

/// Hook batch as returned by the structured-output call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookBatch {
  pub hooks: Vec<String>,
}

/// Errors from the generation collaborator
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
  #[error("Provider not available")]
  NotAvailable,
  #[error("Request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("Provider error: {0}")]
  ProviderError(String),
  #[error("Failed to parse structured response: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("No completion in response")]
  NoResponse,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_script_parses_schema_shape() {
    let json = r#"{
      "hook": "Stop scrolling.",
      "scenes": [
        { "start_secs": 0, "end_secs": 3, "narration": "Stop scrolling.", "visual": "Close-up" }
      ],
      "cta": "Shop now"
    }"#;

    let script: Script = serde_json::from_str(json).unwrap();
    assert_eq!(script.hook, "Stop scrolling.");
    assert_eq!(script.scenes.len(), 1);
    assert_eq!(script.scenes[0].end_secs, 3);
    assert_eq!(script.cta.as_deref(), Some("Shop now"));
  }

  #[test]
  fn test_script_cta_optional() {
    let json = r#"{ "hook": "h", "scenes": [] }"#;
    let script: Script = serde_json::from_str(json).unwrap();
    assert!(script.cta.is_none());
  }
}
