//! Style hint derived from recently liked hooks, for injection into the
//! final generation prompt.

use store::PreferenceStore;
use tracing::debug;

const HEADER: &str = "The user has previously liked hooks like these. Mimic their style, rhythm, and energy:";

/// Render the most recently liked hooks as a prompt fragment.
///
/// Empty when nothing has been liked yet; callers treat an empty string as
/// "no hint to inject", never as an error. Deterministic for a given store
/// state: most-recent first, bounded to `limit` entries.
pub async fn style_hint(store: &PreferenceStore, limit: usize) -> String {
  let liked = store.recent_liked(limit).await;
  if liked.is_empty() {
    return String::new();
  }

  let mut hint = String::from(HEADER);
  for record in &liked {
    hint.push_str("\n- \"");
    hint.push_str(&record.text);
    hint.push('"');
  }

  debug!("Built style hint from {} liked hooks", liked.len());
  hint
}
