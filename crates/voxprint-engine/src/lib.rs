//! Orchestration services for voxprint: profile building, draft
//! generation, and draft review.
//!
//! Each operation runs to completion inside one invocation: one provider
//! call per profile build or generation batch item set, sequential
//! persistence, no background work. Provider failures degrade (empty
//! parses, recorded zero-score reviews) instead of crossing into the
//! store as exceptions.

pub mod error;
pub mod generator;
pub mod profiler;
pub mod prompts;
pub mod retrieval;
pub mod reviewer;

pub use error::{Error, Result};

use sha2::{Digest, Sha256};

/// Content-addressed hash of the exact request sent to a provider,
/// stored with every draft for traceability.
pub(crate) fn request_hash(prompt: &str) -> String {
  let digest = Sha256::digest(prompt.as_bytes());
  hex::encode(digest)[..12].to_string()
}
