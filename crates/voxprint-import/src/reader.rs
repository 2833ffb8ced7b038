//! Export-file reading and shape detection.
//!
//! Three shapes are accepted: line-delimited JSON (one object per line),
//! a whole-document JSON array, and a wrapping object — either a
//! `{"tweets": [...]}` envelope or a single bare object. Files without a
//! telling suffix try line-delimited parsing first and fall back to
//! whole-document parsing.

use std::path::Path;

use serde_json::Value;

use crate::{Error, Result};

/// Read an export file into its constituent objects. Non-object entries
/// (numbers, strings, nulls inside an array) are dropped silently.
pub fn read_export(path: &Path) -> Result<Vec<Value>> {
  if !path.exists() {
    return Err(Error::FileNotFound(path.to_path_buf()));
  }
  let content = std::fs::read_to_string(path)?;

  let suffix = path
    .extension()
    .map(|e| e.to_string_lossy().to_ascii_lowercase());

  match suffix.as_deref() {
    Some("jsonl") => read_lines(&content),
    Some("json") => read_document(&content),
    _ => read_lines(&content).or_else(|_| read_document(&content)),
  }
}

/// One JSON object per line; blank lines are skipped. Fails fast with the
/// 1-based number of the first malformed line.
pub fn read_lines(content: &str) -> Result<Vec<Value>> {
  let mut objects = Vec::new();
  for (idx, line) in content.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let value: Value = serde_json::from_str(line)
      .map_err(|source| Error::Line { line: idx + 1, source })?;
    if value.is_object() {
      objects.push(value);
    }
  }
  Ok(objects)
}

/// A whole-document array, a `tweets`-wrapped array, or a single object.
pub fn read_document(content: &str) -> Result<Vec<Value>> {
  let document: Value =
    serde_json::from_str(content).map_err(Error::Document)?;

  match document {
    Value::Array(items) => {
      Ok(items.into_iter().filter(Value::is_object).collect())
    }
    Value::Object(map) => match map.get("tweets") {
      Some(Value::Array(items)) => {
        Ok(items.iter().filter(|v| v.is_object()).cloned().collect())
      }
      _ => Ok(vec![Value::Object(map)]),
    },
    _ => Err(Error::UnsupportedShape),
  }
}
