//! Local provider — Ollama or any OpenAI-compatible local HTTP server.

use std::time::Duration;

use serde_json::Value;

use crate::{
  Error, JsonRequest, LlmProvider, Result, TextRequest, error_payload,
  recover::recover_json, stub,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "llama3";

/// Locally hosted provider. Ollama endpoints speak `/api/generate`;
/// anything else is assumed to be OpenAI-compatible.
pub struct LocalProvider {
  client:        reqwest::Client,
  base_url:      String,
  default_model: String,
}

impl LocalProvider {
  pub fn new(
    base_url: impl Into<String>,
    default_model: impl Into<String>,
  ) -> Result<Self> {
    // Local models can be slow; allow generous completion time.
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(120))
      .build()?;

    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      default_model: default_model.into(),
    })
  }

  fn is_ollama(&self) -> bool {
    self.base_url.contains("11434")
  }

  async fn complete(
    &self,
    prompt: &str,
    model: &str,
    temperature: f32,
    max_tokens: u32,
  ) -> Result<String> {
    if self.is_ollama() {
      self.ollama_generate(prompt, model, temperature, max_tokens).await
    } else {
      self
        .openai_compatible_generate(prompt, model, temperature, max_tokens)
        .await
    }
  }

  async fn ollama_generate(
    &self,
    prompt: &str,
    model: &str,
    temperature: f32,
    max_tokens: u32,
  ) -> Result<String> {
    let body = serde_json::json!({
      "model": model,
      "prompt": prompt,
      "stream": false,
      "options": {
        "temperature": temperature,
        "num_predict": max_tokens,
      },
    });

    let response = self
      .client
      .post(format!("{}/api/generate", self.base_url))
      .json(&body)
      .send()
      .await?
      .error_for_status()?;

    let data: Value = response.json().await?;
    Ok(data["response"].as_str().unwrap_or_default().to_owned())
  }

  async fn openai_compatible_generate(
    &self,
    prompt: &str,
    model: &str,
    temperature: f32,
    max_tokens: u32,
  ) -> Result<String> {
    let body = serde_json::json!({
      "model": model,
      "messages": [{ "role": "user", "content": prompt }],
      "temperature": temperature,
      "max_tokens": max_tokens,
    });

    let response = self
      .client
      .post(format!("{}/v1/chat/completions", self.base_url))
      .json(&body)
      .send()
      .await?
      .error_for_status()?;

    let data: Value = response.json().await?;
    data["choices"][0]["message"]["content"]
      .as_str()
      .map(str::to_owned)
      .ok_or_else(|| {
        Error::ResponseShape("missing choices[0].message.content".into())
      })
  }
}

impl LlmProvider for LocalProvider {
  fn name(&self) -> &'static str { "local" }

  fn model(&self) -> &str { &self.default_model }

  async fn generate_text(&self, request: TextRequest) -> Result<String> {
    let model = request
      .model
      .as_deref()
      .unwrap_or(&self.default_model)
      .to_owned();

    match self
      .complete(
        &request.prompt,
        &model,
        request.temperature,
        request.max_tokens,
      )
      .await
    {
      Ok(text) => Ok(text),
      Err(Error::Http(e)) if e.is_connect() => {
        tracing::warn!("local provider unreachable, serving stub text");
        Ok(stub::stub_text())
      }
      Err(e) => Err(e),
    }
  }

  async fn generate_json(&self, request: JsonRequest) -> Value {
    let model = request
      .model
      .as_deref()
      .unwrap_or(&self.default_model)
      .to_owned();

    // Local models rarely support structured output natively; ask for
    // bare JSON and run it through recovery.
    let prompt = format!(
      "You must respond with valid JSON only. No other text or \
       explanation.\n\n{}\n\nRespond with JSON only:",
      request.prompt
    );

    match self
      .complete(&prompt, &model, request.temperature, request.max_tokens)
      .await
    {
      Ok(content) => recover_json(&content).unwrap_or_else(|| {
        error_payload("failed to parse JSON from provider response", &content)
      }),
      Err(Error::Http(e)) if e.is_connect() => {
        tracing::warn!("local provider unreachable, serving stub payload");
        stub::stub_json(&request)
      }
      Err(e) => error_payload(format!("provider call failed: {e}"), ""),
    }
  }
}
