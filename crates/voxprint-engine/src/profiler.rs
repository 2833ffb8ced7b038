//! Profile building: one provider call over a stratified sample of
//! stored records, persisted as a new persona version.

use voxprint_core::{
  persona::Persona, sample::stratified_sample, store::PersonaStore,
};
use voxprint_llm::{JsonRequest, LlmProvider};

use crate::{Error, Result, prompts};

/// Cap on how many sampled texts are admitted into the extraction
/// request, however large the sample is.
pub const PROFILE_TEXT_CAP: usize = 400;

/// Options for [`build_persona`].
#[derive(Debug, Clone)]
pub struct ProfileOptions {
  /// Target sample size; 200–400 is the useful range.
  pub sample_size:  usize,
  pub bio:          Option<String>,
  pub pinned_post:  Option<String>,
  /// Override the provider-suggested display label.
  pub display_name: Option<String>,
  /// Rebuild even when a persona already exists.
  pub force:        bool,
}

impl Default for ProfileOptions {
  fn default() -> Self {
    Self {
      sample_size:  300,
      bio:          None,
      pinned_post:  None,
      display_name: None,
      force:        false,
    }
  }
}

/// Build (or reuse) the persona.
///
/// With `force` unset an existing persona is returned untouched — zero
/// provider calls. A rebuild samples the stored records (the sampler is
/// the only path that exposes raw historical text), makes exactly one
/// structured-generation call, and persists the result; the store
/// assigns the version.
pub async fn build_persona<S, P>(
  store: &S,
  provider: &P,
  options: ProfileOptions,
) -> Result<Persona>
where
  S: PersonaStore,
  P: LlmProvider,
{
  if !options.force {
    let existing = store
      .latest_persona()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if let Some(existing) = existing {
      tracing::debug!(version = existing.version, "reusing existing persona");
      return Ok(existing);
    }
  }

  let records = store
    .records_chronological()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if records.is_empty() {
    return Err(Error::NoRecords);
  }

  let sample =
    stratified_sample(&records, options.sample_size, &mut rand::thread_rng());
  let texts: Vec<&str> = sample
    .iter()
    .take(PROFILE_TEXT_CAP)
    .map(|record| record.text.as_str())
    .collect();

  let prompt = prompts::profile_request(
    &texts,
    options.bio.as_deref(),
    options.pinned_post.as_deref(),
  );
  let response = provider
    .generate_json(JsonRequest::new(prompt, Persona::schema_hint()))
    .await;

  if let Some(error) = response.get("error") {
    return Err(Error::Extraction(error.to_string()));
  }
  if !response.is_object() {
    return Err(Error::Extraction(
      "provider returned a non-object payload".to_string(),
    ));
  }

  let mut persona: Persona = serde_json::from_value(response)
    .map_err(|e| Error::Extraction(e.to_string()))?;
  if let Some(name) = options.display_name {
    persona.display_name = name;
  }

  let version = store
    .save_persona(&persona)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  persona.version = version;

  tracing::info!(
    version,
    sampled = sample.len(),
    "persona built from record sample"
  );
  Ok(persona)
}
