use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::provider::{HookGenerator, Result};
use crate::{CreativeBrief, HookBatch, LlmError, Script, prompts};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// OpenRouter chat-completions client with JSON-schema structured output.
#[derive(Debug, Clone)]
pub struct OpenRouterGenerator {
  client: reqwest::Client,
  api_key: String,
  model: String,
}

impl OpenRouterGenerator {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key: api_key.into(),
      model: DEFAULT_MODEL.to_string(),
    }
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  pub fn from_env() -> Option<Self> {
    std::env::var("OPENROUTER_API_KEY").ok().map(Self::new)
  }

  /// Run one structured-output completion and parse the content as `T`.
  async fn complete<T: serde::de::DeserializeOwned>(&self, prompt: String, schema_name: &str, schema: &str) -> Result<T> {
    let schema: &RawValue = serde_json::from_str(schema)?;
    let request = ChatRequest {
      model: &self.model,
      messages: vec![ChatMessage {
        role: "user",
        content: &prompt,
      }],
      response_format: ResponseFormat {
        r#type: "json_schema",
        json_schema: JsonSchemaFormat {
          name: schema_name,
          strict: true,
          schema,
        },
      },
    };

    debug!("OpenRouter completion ({}, {} prompt chars)", schema_name, prompt.len());

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
      warn!("OpenRouter completion failed: {} - {}", status, body);
      return Err(LlmError::ProviderError(format!("OpenRouter returned {}: {}", status, body)));
    }

    let completion: ChatResponse = response.json().await?;
    let content = completion
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or(LlmError::NoResponse)?;

    Ok(serde_json::from_str(&content)?)
  }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
  r#type: &'a str,
  json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
  name: &'a str,
  strict: bool,
  schema: &'a RawValue,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
  content: String,
}

#[async_trait]
impl HookGenerator for OpenRouterGenerator {
  fn name(&self) -> &str {
    "openrouter"
  }

  fn is_available(&self) -> bool {
    !self.api_key.is_empty()
  }

  async fn generate_hooks(&self, brief: &CreativeBrief, directive: Option<&str>, count: usize) -> Result<Vec<String>> {
    let prompt = prompts::hook_prompt(brief, directive, count);
    let batch: HookBatch = self.complete(prompt, "hook_batch", prompts::HOOKS_SCHEMA).await?;

    let mut hooks = batch.hooks;
    if hooks.len() > count {
      hooks.truncate(count);
    }

    debug!("Generated {} candidate hooks", hooks.len());
    Ok(hooks)
  }

  async fn generate_script(&self, brief: &CreativeBrief, directive: &str, style_hint: Option<&str>) -> Result<Script> {
    let prompt = prompts::script_prompt(brief, directive, style_hint);
    let script: Script = self.complete(prompt, "ad_script", prompts::SCRIPT_SCHEMA).await?;

    debug!("Generated script with {} scenes", script.scenes.len());
    Ok(script)
  }
}
