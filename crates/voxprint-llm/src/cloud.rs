//! Cloud provider — any OpenAI-compatible chat-completions API.

use std::time::Duration;

use serde_json::Value;

use crate::{
  Error, JsonRequest, LlmProvider, Result, TextRequest, error_payload,
  recover::recover_json, stub,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const JSON_SYSTEM_MESSAGE: &str =
  "You must respond with valid JSON only. No other text.";

/// Cloud chat-completions provider.
///
/// Built without an API key it serves deterministic stub payloads, so
/// the pipeline stays runnable before credentials are configured.
pub struct CloudProvider {
  client:        reqwest::Client,
  base_url:      String,
  api_key:       Option<String>,
  default_model: String,
}

impl CloudProvider {
  pub fn new(
    base_url: impl Into<String>,
    api_key: Option<String>,
    default_model: impl Into<String>,
  ) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()?;

    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      api_key: api_key.filter(|k| !k.is_empty()),
      default_model: default_model.into(),
    })
  }

  fn completions_url(&self) -> String {
    format!("{}/v1/chat/completions", self.base_url)
  }

  /// POST a chat-completions payload and return the first choice's text.
  async fn complete(&self, body: Value, api_key: &str) -> Result<String> {
    let response = self
      .client
      .post(self.completions_url())
      .bearer_auth(api_key)
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

impl LlmProvider for CloudProvider {
  fn name(&self) -> &'static str { "cloud" }

  fn model(&self) -> &str { &self.default_model }

  async fn generate_text(&self, request: TextRequest) -> Result<String> {
    let Some(api_key) = self.api_key.clone() else {
      return Ok(stub::stub_text());
    };

    let model =
      request.model.unwrap_or_else(|| self.default_model.clone());
    let body = serde_json::json!({
      "model": model,
      "messages": [{ "role": "user", "content": request.prompt }],
      "temperature": request.temperature,
      "max_tokens": request.max_tokens,
    });

    self.complete(body, &api_key).await
  }

  async fn generate_json(&self, request: JsonRequest) -> Value {
    let Some(api_key) = self.api_key.clone() else {
      return stub::stub_json(&request);
    };

    let model = request
      .model
      .clone()
      .unwrap_or_else(|| self.default_model.clone());
    let body = serde_json::json!({
      "model": model,
      "messages": [
        { "role": "system", "content": JSON_SYSTEM_MESSAGE },
        { "role": "user", "content": request.prompt },
      ],
      "temperature": request.temperature,
      "max_tokens": request.max_tokens,
      "response_format": { "type": "json_object" },
    });

    match self.complete(body, &api_key).await {
      Ok(content) => recover_json(&content).unwrap_or_else(|| {
        error_payload("failed to parse JSON from provider response", &content)
      }),
      Err(Error::Http(e)) if e.is_connect() => {
        tracing::warn!("cloud provider unreachable, serving stub payload");
        stub::stub_json(&request)
      }
      Err(e) => error_payload(format!("provider call failed: {e}"), ""),
    }
  }
}
