//! Error type for `voxprint-import`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file not found: {0}")]
  FileNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A malformed line in a line-delimited export. The serde error carries
  /// column context; the line number is ours.
  #[error("invalid JSON on line {line}: {source}")]
  Line {
    line:   usize,
    source: serde_json::Error,
  },

  /// A malformed whole-document export. The serde error carries line and
  /// column position context.
  #[error("invalid JSON document: {0}")]
  Document(#[source] serde_json::Error),

  #[error("export must be a JSON array or object")]
  UnsupportedShape,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
