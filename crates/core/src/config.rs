//! Configuration for the hook ranking engine.
//!
//! Config priority: explicit path > user config (~/.config/hookrank/config.toml) > defaults.
//! A missing or unparseable file falls back to defaults; config is never a
//! reason the creative flow fails to start.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::preference::{DEFAULT_CANDIDATE_COUNT, DEFAULT_STYLE_HINT_LIMIT, MAX_MEMORY_LIMIT};

/// Embedding backend options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
  #[default]
  OpenRouter,
}

/// Embedding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
  /// Which embedding backend to use
  pub backend: EmbeddingBackend,

  /// Model name (e.g., "openai/text-embedding-3-small")
  pub model: String,

  /// Embedding dimensions (e.g., 1536, 768)
  pub dimensions: usize,

  /// OpenRouter API key. If not set, reads from OPENROUTER_API_KEY env var
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
  fn default() -> Self {
    Self {
      backend: EmbeddingBackend::OpenRouter,
      model: "openai/text-embedding-3-small".to_string(),
      dimensions: 1536,
      api_key: None,
    }
  }
}

/// Hook and script generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
  /// Chat model used for hooks and scripts
  pub model: String,

  /// Hook candidates generated per selection cycle (default: 5)
  pub candidate_count: usize,

  /// Recent liked hooks folded into the style hint (default: 3)
  pub style_hint_limit: usize,
}

impl Default for GenerationConfig {
  fn default() -> Self {
    Self {
      model: "openai/gpt-4o-mini".to_string(),
      candidate_count: DEFAULT_CANDIDATE_COUNT,
      style_hint_limit: DEFAULT_STYLE_HINT_LIMIT,
    }
  }
}

/// Preference memory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
  /// Rolling-window size: judged hooks retained before oldest are evicted (default: 50)
  pub limit: usize,

  /// Where the judged-hook file lives. Defaults to the user data dir.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<PathBuf>,
}

impl Default for MemoryConfig {
  fn default() -> Self {
    Self {
      limit: MAX_MEMORY_LIMIT,
      path: None,
    }
  }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  #[serde(default)]
  pub embedding: EmbeddingConfig,

  #[serde(default)]
  pub generation: GenerationConfig,

  #[serde(default)]
  pub memory: MemoryConfig,
}

impl Config {
  /// Load config from the user config dir, falling back to defaults.
  pub fn load() -> Self {
    let Some(path) = Self::user_config_path() else {
      return Self::default();
    };
    Self::load_from(&path)
  }

  /// Load config from an explicit path, falling back to defaults.
  pub fn load_from(path: &Path) -> Self {
    if let Ok(content) = std::fs::read_to_string(path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }
    Self::default()
  }

  /// `~/.config/hookrank/config.toml`
  pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hookrank").join("config.toml"))
  }

  /// Resolve the API key: config first, then environment.
  pub fn api_key(&self) -> Option<String> {
    self
      .embedding
      .api_key
      .clone()
      .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
  }

  /// Default path for the persisted preference file.
  pub fn preference_path(&self) -> Option<PathBuf> {
    self
      .memory
      .path
      .clone()
      .or_else(|| dirs::data_dir().map(|d| d.join("hookrank").join("preferences.json")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.memory.limit, MAX_MEMORY_LIMIT);
    assert_eq!(config.generation.candidate_count, DEFAULT_CANDIDATE_COUNT);
    assert_eq!(config.generation.style_hint_limit, DEFAULT_STYLE_HINT_LIMIT);
    assert_eq!(config.embedding.backend, EmbeddingBackend::OpenRouter);
  }

  #[test]
  fn test_load_missing_file_falls_back() {
    let config = Config::load_from(Path::new("/nonexistent/hookrank.toml"));
    assert_eq!(config.memory.limit, MAX_MEMORY_LIMIT);
  }

  #[test]
  fn test_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[generation]\ncandidate_count = 8").unwrap();

    let config = Config::load_from(file.path());
    assert_eq!(config.generation.candidate_count, 8);
    // Unspecified sections keep defaults
    assert_eq!(config.memory.limit, MAX_MEMORY_LIMIT);
  }

  #[test]
  fn test_load_garbage_falls_back() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not toml at all {{{{").unwrap();

    let config = Config::load_from(file.path());
    assert_eq!(config.generation.candidate_count, DEFAULT_CANDIDATE_COUNT);
  }

  #[test]
  fn test_roundtrip() {
    let config = Config::default();
    let s = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&s).unwrap();
    assert_eq!(parsed.embedding.model, config.embedding.model);
  }
}
