use crate::{EmbeddingError, EmbeddingProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/embeddings";
const DEFAULT_MODEL: &str = "openai/text-embedding-3-small";
const DEFAULT_DIMENSIONS: usize = 1536;
/// Hooks are one-liners, so batches stay tiny in practice; 64 keeps a
/// worst-case bulk re-embed to a single request.
const DEFAULT_MAX_BATCH_SIZE: usize = 64;

/// OpenRouter embeddings client.
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
  client: reqwest::Client,
  api_key: String,
  model: String,
  dimensions: usize,
  /// Maximum texts per batch request
  max_batch_size: usize,
}

impl OpenRouterProvider {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key: api_key.into(),
      model: DEFAULT_MODEL.to_string(),
      dimensions: DEFAULT_DIMENSIONS,
      max_batch_size: DEFAULT_MAX_BATCH_SIZE,
    }
  }

  pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
    self.model = model.into();
    self.dimensions = dimensions;
    self
  }

  /// Set the maximum batch size for embedding requests
  pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
    self.max_batch_size = max_batch_size.max(1); // At least 1
    self
  }

  pub fn max_batch_size(&self) -> usize {
    self.max_batch_size
  }

  pub fn from_env() -> Option<Self> {
    std::env::var("OPENROUTER_API_KEY").ok().map(Self::new)
  }

  async fn request(&self, input: EmbeddingInput<'_>) -> Result<EmbeddingResponse, EmbeddingError> {
    let request = EmbeddingRequest {
      model: &self.model,
      input,
    };

    let response = self
      .client
      .post(OPENROUTER_URL)
      .header("Authorization", format!("Bearer {}", self.api_key))
      .header("Content-Type", "application/json")
      .json(&request)
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      warn!("OpenRouter embedding failed: {} - {}", status, body);
      return Err(EmbeddingError::ProviderError(format!(
        "OpenRouter returned {}: {}",
        status, body
      )));
    }

    Ok(response.json().await?)
  }

  /// Embed a single batch of texts (internal helper)
  async fn embed_single_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
      return Ok(Vec::new());
    }

    debug!(
      "Embedding batch of {} hooks with OpenRouter (model: {})",
      texts.len(),
      self.model
    );

    let result = self.request(EmbeddingInput::Batch(texts.to_vec())).await?;

    if result.data.len() != texts.len() {
      warn!(
        "Batch size mismatch: got {} embeddings for {} inputs",
        result.data.len(),
        texts.len()
      );
      return Err(EmbeddingError::ProviderError(format!(
        "Batch size mismatch: got {} embeddings for {} inputs",
        result.data.len(),
        texts.len()
      )));
    }

    Ok(result.data.into_iter().map(|d| d.embedding).collect())
  }

  /// Split oversized batches into concurrent sub-batches and reassemble
  /// them in input order. Any sub-batch failure fails the whole call:
  /// callers never see partially-embedded batches.
  async fn embed_batch_concurrent(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let num_batches = texts.len().div_ceil(self.max_batch_size);

    if num_batches <= 1 {
      return self.embed_single_batch(texts).await;
    }

    debug!(
      "Processing {} texts in {} concurrent sub-batches (max batch size: {})",
      texts.len(),
      num_batches,
      self.max_batch_size
    );

    let futures: Vec<_> = texts
      .chunks(self.max_batch_size)
      .enumerate()
      .map(|(batch_idx, chunk)| {
        let provider = self.clone();
        let chunk_owned: Vec<String> = chunk.iter().map(|s| s.to_string()).collect();
        async move {
          let chunk_refs: Vec<&str> = chunk_owned.iter().map(|s| s.as_str()).collect();
          let embeddings = provider.embed_single_batch(&chunk_refs).await?;
          Ok::<_, EmbeddingError>((batch_idx, embeddings))
        }
      })
      .collect();

    let results = futures::future::join_all(futures).await;

    let mut indexed: Vec<(usize, Vec<Vec<f32>>)> = Vec::with_capacity(num_batches);
    for result in results {
      indexed.push(result?);
    }
    indexed.sort_by_key(|(idx, _)| *idx);

    let mut all_embeddings = Vec::with_capacity(texts.len());
    for (_, embeddings) in indexed {
      all_embeddings.extend(embeddings);
    }

    Ok(all_embeddings)
  }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: EmbeddingInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingInput<'a> {
  Single(&'a str),
  Batch(Vec<&'a str>),
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
  embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenRouterProvider {
  fn name(&self) -> &str {
    "openrouter"
  }

  fn model_id(&self) -> &str {
    &self.model
  }

  fn dimensions(&self) -> usize {
    self.dimensions
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    debug!("Embedding hook with OpenRouter: {} chars", text.len());

    let result = self.request(EmbeddingInput::Single(text)).await?;

    result
      .data
      .into_iter()
      .next()
      .map(|d| d.embedding)
      .ok_or_else(|| EmbeddingError::ProviderError("No embedding in response".into()))
  }

  async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
      return Ok(Vec::new());
    }

    self.embed_batch_concurrent(texts).await
  }

  async fn is_available(&self) -> bool {
    // Cloud service, just check we have an API key
    !self.api_key.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_provider_new() {
    let provider = OpenRouterProvider::new("test-key");
    assert_eq!(provider.name(), "openrouter");
    assert_eq!(provider.model_id(), DEFAULT_MODEL);
    assert_eq!(provider.dimensions(), DEFAULT_DIMENSIONS);
    assert_eq!(provider.max_batch_size(), DEFAULT_MAX_BATCH_SIZE);
  }

  #[test]
  fn test_provider_customization() {
    let provider = OpenRouterProvider::new("test-key")
      .with_model("custom/model", 512)
      .with_max_batch_size(32);

    assert_eq!(provider.model_id(), "custom/model");
    assert_eq!(provider.dimensions(), 512);
    assert_eq!(provider.max_batch_size(), 32);
  }

  #[test]
  fn test_max_batch_size_minimum() {
    // Batch size should never be 0
    let provider = OpenRouterProvider::new("test-key").with_max_batch_size(0);
    assert_eq!(provider.max_batch_size(), 1);
  }

  #[tokio::test]
  async fn test_is_available_with_key() {
    let provider = OpenRouterProvider::new("test-key");
    assert!(provider.is_available().await);
  }

  #[tokio::test]
  async fn test_is_available_without_key() {
    let provider = OpenRouterProvider::new("");
    assert!(!provider.is_available().await);
  }

  #[tokio::test]
  async fn test_embed_batch_empty() {
    let provider = OpenRouterProvider::new("test-key");
    let result = provider.embed_batch(&[]).await;
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
  }

  #[test]
  fn test_batch_request_serializes_as_array() {
    let request = EmbeddingRequest {
      model: "m",
      input: EmbeddingInput::Batch(vec!["a", "b"]),
    };
    let json = serde_json::to_value(&request).unwrap();
    assert!(json["input"].is_array());
  }

  #[test]
  fn test_single_request_serializes_as_string() {
    let request = EmbeddingRequest {
      model: "m",
      input: EmbeddingInput::Single("a"),
    };
    let json = serde_json::to_value(&request).unwrap();
    assert!(json["input"].is_string());
  }
}
