//! Error type for `voxprint-engine`.
//!
//! Only validation and state-precondition failures surface here; their
//! messages are written to be shown verbatim to an end user. Provider
//! transport failures never appear — they degrade inside the services.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no records available for profiling; import an export first")]
  NoRecords,

  #[error("no voice profile has been built yet; run `voxprint profile` first")]
  NoPersona,

  #[error("profile extraction failed: {0}")]
  Extraction(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
