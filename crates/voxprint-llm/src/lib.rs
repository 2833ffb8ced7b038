//! Text- and JSON-generation capability for voxprint.
//!
//! Two provider implementations sit behind one trait: a cloud
//! OpenAI-compatible API and a locally hosted HTTP server (Ollama or any
//! OpenAI-compatible endpoint). Callers select by configuration and by
//! named role — never by provider-specific logic.
//!
//! The JSON path never fails from the caller's point of view:
//! connection failures degrade to deterministic stub payloads and
//! unparseable output degrades to an error-tagged object, so
//! orchestrators downstream see zero usable rows instead of a transport
//! exception.

#![allow(async_fn_in_trait)]

pub mod cloud;
pub mod error;
pub mod factory;
pub mod local;
pub mod recover;
mod stub;

pub use cloud::CloudProvider;
pub use error::{Error, Result};
pub use factory::{LlmClient, LlmSettings, ProviderKind, ProviderRole, build_provider};
pub use local::LocalProvider;

use std::future::Future;

use serde_json::Value;

// ─── Requests ────────────────────────────────────────────────────────────────

/// Parameters for a free-form text generation call.
#[derive(Debug, Clone)]
pub struct TextRequest {
  pub prompt:      String,
  /// Model override; the provider's default applies when absent.
  pub model:       Option<String>,
  pub temperature: f32,
  pub max_tokens:  u32,
}

impl TextRequest {
  pub fn new(prompt: impl Into<String>) -> Self {
    Self {
      prompt:      prompt.into(),
      model:       None,
      temperature: 0.7,
      max_tokens:  1024,
    }
  }
}

/// Parameters for a structured JSON generation call.
#[derive(Debug, Clone)]
pub struct JsonRequest {
  pub prompt:      String,
  /// Loose schema describing the expected shape; advisory, not enforced.
  pub schema_hint: Value,
  pub model:       Option<String>,
  pub temperature: f32,
  pub max_tokens:  u32,
}

impl JsonRequest {
  pub fn new(prompt: impl Into<String>, schema_hint: Value) -> Self {
    Self {
      prompt: prompt.into(),
      schema_hint,
      model: None,
      temperature: 0.2,
      max_tokens: 8192,
    }
  }

  pub fn with_temperature(mut self, temperature: f32) -> Self {
    self.temperature = temperature;
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A text/JSON generation backend.
pub trait LlmProvider: Send + Sync {
  /// Short provider tag recorded in draft provenance.
  fn name(&self) -> &'static str;

  /// The model label used when a request has no override; recorded in
  /// draft provenance.
  fn model(&self) -> &str;

  fn generate_text(
    &self,
    request: TextRequest,
  ) -> impl Future<Output = Result<String>> + Send + '_;

  /// Never fails: on total failure the returned object carries an
  /// `"error"` key instead.
  fn generate_json(
    &self,
    request: JsonRequest,
  ) -> impl Future<Output = Value> + Send + '_;
}

/// The error-tagged payload produced when a provider response cannot be
/// turned into JSON.
pub(crate) fn error_payload(message: impl Into<String>, raw: &str) -> Value {
  let prefix: String = raw.chars().take(500).collect();
  serde_json::json!({ "error": message.into(), "raw": prefix })
}
