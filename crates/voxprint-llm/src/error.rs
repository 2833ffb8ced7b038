//! Error type for `voxprint-llm`.
//!
//! Only the free-form text path surfaces these; the JSON path absorbs
//! failures into error-tagged payloads.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("provider returned an unexpected response shape: {0}")]
  ResponseShape(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
