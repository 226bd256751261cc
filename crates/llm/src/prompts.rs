//! Prompts and JSON schemas for hook and script generation.
//!
//! Uses JSON schemas for structured output validation.

use crate::CreativeBrief;

/// JSON schema for the hook batch response
pub const HOOKS_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "hooks": {
      "type": "array",
      "items": { "type": "string" }
    }
  },
  "required": ["hooks"]
}"#;

/// JSON schema for the final script response
pub const SCRIPT_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "hook": { "type": "string" },
    "scenes": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "start_secs": { "type": "integer", "minimum": 0 },
          "end_secs": { "type": "integer", "minimum": 0 },
          "narration": { "type": "string" },
          "visual": { "type": "string" }
        },
        "required": ["start_secs", "end_secs", "narration", "visual"]
      }
    },
    "cta": { "type": ["string", "null"] }
  },
  "required": ["hook", "scenes"]
}"#;

/// Build the prompt for a batch of candidate hooks.
pub fn hook_prompt(brief: &CreativeBrief, directive: Option<&str>, count: usize) -> String {
  let mut prompt = format!(
    "Write {count} distinct opening hooks for a short-form video ad.\n\n\
     Product analysis:\n{}\n\n\
     Niche: {}\nTone: {}\n\n\
     Each hook is one spoken line designed to stop the scroll in the first two seconds. \
     No hashtags, no emoji, no numbering inside the text.",
    brief.context, brief.niche, brief.tone
  );

  if let Some(directive) = directive {
    prompt.push_str(&format!("\n\nAngle to build on: {directive}"));
  }

  prompt
}

/// Build the prompt for the final timed-scene script.
///
/// The selected hook is the primary instruction; the style hint, when
/// present, is appended verbatim as auxiliary context.
pub fn script_prompt(brief: &CreativeBrief, directive: &str, style_hint: Option<&str>) -> String {
  let mut prompt = format!(
    "Write a complete short-form video ad script, broken into timed scenes.\n\n\
     Product analysis:\n{}\n\n\
     Niche: {}\nTone: {}\n\n\
     Open with exactly this hook: \"{directive}\"\n\
     Keep the whole script under 45 seconds. Every scene needs narration and a visual direction.",
    brief.context, brief.niche, brief.tone
  );

  if let Some(hint) = style_hint {
    if !hint.is_empty() {
      prompt.push_str("\n\n");
      prompt.push_str(hint);
    }
  }

  prompt
}
