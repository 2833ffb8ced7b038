//! [`SqliteStore`] — the SQLite implementation of [`PersonaStore`].

use std::future::Future;
use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;
use voxprint_core::{
  draft::{Draft, DraftProvenance},
  persona::Persona,
  record::{NewRecord, SourceRecord},
  review::Review,
  store::{
    BatchOutcome, InsertOutcome, PersonaStore, RecordQuery,
  },
};

use crate::{
  Error, Result,
  encode::{
    RawDraft, RawRecord, RawReview, encode_algo, encode_algo_review,
    encode_draft_kind, encode_dt, encode_metrics, encode_reply,
    encode_spice, encode_tags, encode_text_parts, encode_uuid,
  },
  schema::SCHEMA,
};

const RECORD_COLUMNS: &str =
  "record_id, created_at, text, url, origin, lang, metrics_json, raw_json";

const DRAFT_COLUMNS: &str = "id, kind, topic, spice, persona_version, \
   text_json, tags_json, rationale, confidence, reply_json, algo_json";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A voxprint store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Row tuple for a record insert. `INSERT OR IGNORE` carries the
  /// skip-on-collision semantics; the caller checks the change count.
  fn record_params(
    input: &NewRecord,
  ) -> Result<(
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
  )> {
    let metrics_json =
      input.metrics.as_ref().map(|m| encode_metrics(m)).transpose()?;
    let raw_json = input
      .raw
      .as_ref()
      .map(serde_json::to_string)
      .transpose()?;

    Ok((
      input.record_id.clone(),
      input.created_at.clone(),
      input.text.clone(),
      input.url.clone(),
      input.origin.clone(),
      input.lang.clone(),
      metrics_json,
      raw_json,
    ))
  }
}

// ─── PersonaStore impl ───────────────────────────────────────────────────────

impl PersonaStore for SqliteStore {
  type Error = Error;

  // ── Records ───────────────────────────────────────────────────────────────

  async fn insert_record(&self, input: NewRecord) -> Result<InsertOutcome> {
    let params = Self::record_params(&input)?;

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO records
             (record_id, created_at, text, url, origin, lang, metrics_json, raw_json)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            params.0, params.1, params.2, params.3, params.4, params.5,
            params.6, params.7,
          ],
        )?;
        Ok(changed)
      })
      .await?;

    Ok(if changed == 0 {
      InsertOutcome::Duplicate
    } else {
      InsertOutcome::Inserted
    })
  }

  async fn insert_records(
    &self,
    inputs: Vec<NewRecord>,
  ) -> Result<BatchOutcome> {
    let mut rows = Vec::with_capacity(inputs.len());
    for input in &inputs {
      rows.push(Self::record_params(input)?);
    }

    let outcome: BatchOutcome = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "INSERT OR IGNORE INTO records
             (record_id, created_at, text, url, origin, lang, metrics_json, raw_json)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        let mut outcome = BatchOutcome::default();
        for row in rows {
          let changed = stmt.execute(rusqlite::params![
            row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7,
          ])?;
          if changed == 0 {
            outcome.duplicate += 1;
          } else {
            outcome.inserted += 1;
          }
        }
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn record_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }

  async fn recent_records(
    &self,
    query: RecordQuery,
  ) -> Result<Vec<SourceRecord>> {
    let limit = query.limit.unwrap_or(100) as i64;
    let offset = query.offset.unwrap_or(0) as i64;
    let since = query.since;

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let sql = if since.is_some() {
          format!(
            "SELECT {RECORD_COLUMNS} FROM records
             WHERE created_at >= ?1
             ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
          )
        } else {
          format!(
            "SELECT {RECORD_COLUMNS} FROM records
             ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
          )
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![since.as_deref(), limit, offset],
            read_record_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn records_chronological(&self) -> Result<Vec<SourceRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM records ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map([], read_record_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  // ── Personas ──────────────────────────────────────────────────────────────

  fn save_persona(
    &self,
    persona: &Persona,
  ) -> impl Future<Output = Result<i64>> + Send + '_ {
    let prepared = (|| -> Result<_> {
      let persona_json = serde_json::to_string(persona)?;
      let at_str = encode_dt(Utc::now());
      Ok((persona_json, at_str))
    })();

    async move {
      let (persona_json, at_str) = prepared?;

      let version: i64 = self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO persona_versions (created_at, persona_json)
             VALUES (?1, ?2)",
            rusqlite::params![at_str, persona_json],
          )?;
          Ok(conn.last_insert_rowid())
        })
        .await?;

      Ok(version)
    }
  }

  async fn latest_persona(&self) -> Result<Option<Persona>> {
    let row: Option<(i64, String)> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT version, persona_json FROM persona_versions
               ORDER BY version DESC LIMIT 1",
              [],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    row.map(decode_persona_row).transpose()
  }

  async fn persona_by_version(&self, version: i64) -> Result<Option<Persona>> {
    let row: Option<(i64, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT version, persona_json FROM persona_versions
               WHERE version = ?1",
              rusqlite::params![version],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    row.map(decode_persona_row).transpose()
  }

  // ── Drafts ────────────────────────────────────────────────────────────────

  fn save_draft(
    &self,
    draft: &Draft,
    provenance: &DraftProvenance,
  ) -> impl Future<Output = Result<()>> + Send + '_ {
    let prepared = (|| -> Result<_> {
      Ok((
        encode_uuid(draft.id),
        encode_dt(Utc::now()),
        encode_draft_kind(draft.kind).to_owned(),
        draft.topic.clone(),
        encode_spice(draft.spice).to_owned(),
        draft.persona_version,
        encode_text_parts(&draft.text)?,
        encode_tags(&draft.tags)?,
        draft.rationale.clone(),
        draft.confidence,
        draft.reply.as_ref().map(encode_reply).transpose()?,
        draft.algo.as_ref().map(encode_algo).transpose()?,
        provenance.provider.clone(),
        provenance.model.clone(),
        provenance.prompt_hash.clone(),
      ))
    })();

    async move {
      let (
        id_str,
        at_str,
        kind_str,
        topic,
        spice_str,
        persona_version,
        text_json,
        tags_json,
        rationale,
        confidence,
        reply_json,
        algo_json,
        provider,
        model,
        prompt_hash,
      ) = prepared?;

      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO drafts (
               id, created_at, kind, topic, spice, persona_version,
               text_json, tags_json, rationale, confidence,
               reply_json, algo_json, provider, model, prompt_hash
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            rusqlite::params![
              id_str,
              at_str,
              kind_str,
              topic,
              spice_str,
              persona_version,
              text_json,
              tags_json,
              rationale,
              confidence,
              reply_json,
              algo_json,
              provider,
              model,
              prompt_hash,
            ],
          )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  async fn recent_drafts(&self, limit: usize) -> Result<Vec<Draft>> {
    let limit = limit as i64;

    let raws: Vec<RawDraft> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DRAFT_COLUMNS} FROM drafts
           ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], read_draft_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDraft::into_draft).collect()
  }

  async fn draft_by_id(&self, id: Uuid) -> Result<Option<Draft>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDraft> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = ?1"),
              rusqlite::params![id_str],
              read_draft_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDraft::into_draft).transpose()
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  fn save_review(
    &self,
    review: &Review,
  ) -> impl Future<Output = Result<()>> + Send + '_ {
    let prepared = (|| -> Result<_> {
      Ok((
        encode_uuid(review.id),
        encode_uuid(review.draft_id),
        encode_dt(Utc::now()),
        review.alignment_score,
        encode_tags(&review.violations)?,
        encode_tags(&review.suggestions)?,
        review.revised_text.clone(),
        review.algo.as_ref().map(encode_algo_review).transpose()?,
      ))
    })();

    async move {
      let (
        id_str,
        draft_id_str,
        at_str,
        alignment_score,
        violations_json,
        suggestions_json,
        revised_text,
        algo_json,
      ) = prepared?;

      self
        .conn
        .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (
             id, draft_id, created_at, alignment_score,
             violations_json, suggestions_json, revised_text, algo_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            draft_id_str,
            at_str,
            alignment_score,
            violations_json,
            suggestions_json,
            revised_text,
            algo_json,
          ],
        )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  async fn reviews_for_draft(&self, draft_id: Uuid) -> Result<Vec<Review>> {
    let draft_id_str = encode_uuid(draft_id);

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, draft_id, alignment_score, violations_json,
                  suggestions_json, revised_text, algo_json
           FROM reviews WHERE draft_id = ?1
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![draft_id_str], |row| {
            Ok(RawReview {
              id:               row.get(0)?,
              draft_id:         row.get(1)?,
              alignment_score:  row.get(2)?,
              violations_json:  row.get(3)?,
              suggestions_json: row.get(4)?,
              revised_text:     row.get(5)?,
              algo_json:        row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }
}

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
  Ok(RawRecord {
    record_id:    row.get(0)?,
    created_at:   row.get(1)?,
    text:         row.get(2)?,
    url:          row.get(3)?,
    origin:       row.get(4)?,
    lang:         row.get(5)?,
    metrics_json: row.get(6)?,
    raw_json:     row.get(7)?,
  })
}

fn read_draft_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDraft> {
  Ok(RawDraft {
    id:              row.get(0)?,
    kind:            row.get(1)?,
    topic:           row.get(2)?,
    spice:           row.get(3)?,
    persona_version: row.get(4)?,
    text_json:       row.get(5)?,
    tags_json:       row.get(6)?,
    rationale:       row.get(7)?,
    confidence:      row.get(8)?,
    reply_json:      row.get(9)?,
    algo_json:       row.get(10)?,
  })
}

/// The authoritative version is the row's primary key, not whatever the
/// serialised JSON happens to carry.
fn decode_persona_row((version, json): (i64, String)) -> Result<Persona> {
  let mut persona: Persona = serde_json::from_str(&json)?;
  persona.version = version;
  Ok(persona)
}
