//! Batch import into a [`PersonaStore`].

use std::path::Path;

use serde_json::Value;
use voxprint_core::store::PersonaStore;

use crate::{Error, Result, normalize::normalize, reader};

/// The full return contract of a batch import: three counts plus the
/// store's running total after the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub inserted:          u64,
  pub skipped_invalid:   u64,
  pub skipped_duplicate: u64,
  pub total:             u64,
}

/// Import one export file. Invalid records and duplicates are counted,
/// never fatal; only unreadable files and malformed JSON abort.
pub async fn import_file<S>(store: &S, path: &Path) -> Result<ImportReport>
where
  S: PersonaStore,
{
  let objects = reader::read_export(path)?;
  let report = import_objects(store, objects).await?;
  tracing::info!(
    path = %path.display(),
    inserted = report.inserted,
    skipped_invalid = report.skipped_invalid,
    skipped_duplicate = report.skipped_duplicate,
    "import complete"
  );
  Ok(report)
}

/// Import already-parsed export objects, sequentially and in input order.
pub async fn import_objects<S>(
  store: &S,
  objects: Vec<Value>,
) -> Result<ImportReport>
where
  S: PersonaStore,
{
  let mut skipped_invalid = 0u64;
  let mut valid = Vec::with_capacity(objects.len());

  for object in &objects {
    match normalize(object) {
      Some(record) => valid.push(record),
      None => skipped_invalid += 1,
    }
  }

  let outcome = store
    .insert_records(valid)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let total = store
    .record_count()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(ImportReport {
    inserted: outcome.inserted,
    skipped_invalid,
    skipped_duplicate: outcome.duplicate,
    total,
  })
}

/// Dry-run validation of an export file: parse and normalise without
/// touching any store. Returns whether the file is importable and a
/// human-readable summary.
pub fn validate_file(path: &Path) -> Result<(bool, String)> {
  let objects = match reader::read_export(path) {
    Ok(objects) => objects,
    Err(e @ (Error::Line { .. } | Error::Document(_) | Error::UnsupportedShape)) => {
      return Ok((false, e.to_string()));
    }
    Err(e) => return Err(e),
  };

  if objects.is_empty() {
    return Ok((false, "file contains no records".to_string()));
  }

  let total = objects.len();
  let valid = objects.iter().filter(|o| normalize(o).is_some()).count();

  if valid == 0 {
    return Ok((
      false,
      format!("found {total} records but none have required fields"),
    ));
  }

  Ok((true, format!("valid: {valid}/{total} records have required fields")))
}
