pub mod config;
pub mod preference;

pub use config::{Config, EmbeddingBackend, EmbeddingConfig, GenerationConfig, MemoryConfig};
pub use preference::{
  CandidateScore, DEFAULT_CANDIDATE_COUNT, DEFAULT_STYLE_HINT_LIMIT, MAX_MEMORY_LIMIT, NEUTRAL_SCORE, PreferenceRecord,
};
