//! Generation provider trait: the two call shapes the selection pipeline
//! needs from the external text-generation collaborator.

use async_trait::async_trait;

use crate::{CreativeBrief, LlmError, Script};

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// The external text-generation collaborator.
///
/// One implementation per backend; the pipeline only ever sees this trait.
#[async_trait]
pub trait HookGenerator: Send + Sync {
  /// The name of this provider (for logging/identification)
  fn name(&self) -> &str;

  /// Check if this provider is available/configured
  fn is_available(&self) -> bool;

  /// Generate a batch of candidate hooks for the brief.
  ///
  /// `directive` optionally steers generation toward an already-selected
  /// angle; `count` bounds the batch.
  async fn generate_hooks(&self, brief: &CreativeBrief, directive: Option<&str>, count: usize) -> Result<Vec<String>>;

  /// Generate the final timed-scene script. `directive` is the selected
  /// hook (primary instruction); `style_hint` is the preference summary
  /// (auxiliary context), absent when there is nothing learned yet.
  async fn generate_script(&self, brief: &CreativeBrief, directive: &str, style_hint: Option<&str>) -> Result<Script>;
}
