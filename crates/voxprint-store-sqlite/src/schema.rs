//! SQL schema for the voxprint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated
//! on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Imported posts. Strictly insert-only: no UPDATE or DELETE is ever
-- issued against this table, and a colliding record_id is skipped.
CREATE TABLE IF NOT EXISTS records (
    record_id    TEXT PRIMARY KEY,
    created_at   TEXT NOT NULL,    -- verbatim export timestamp
    text         TEXT NOT NULL,
    url          TEXT,
    origin       TEXT NOT NULL DEFAULT 'extension',
    lang         TEXT,
    metrics_json TEXT,             -- JSON object or NULL
    raw_json     TEXT              -- untouched input object or NULL
);

-- Persona versions are append-only; the version number is assigned here
-- and never reused. The row with the maximum version is 'latest'.
CREATE TABLE IF NOT EXISTS persona_versions (
    version      INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at   TEXT NOT NULL,    -- ISO 8601 UTC; store-assigned
    persona_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS drafts (
    id              TEXT PRIMARY KEY,
    created_at      TEXT NOT NULL, -- ISO 8601 UTC; store-assigned
    kind            TEXT NOT NULL, -- 'tweet' | 'thread_outline' | 'thread_draft' | 'reply'
    topic           TEXT NOT NULL,
    spice           TEXT NOT NULL,
    persona_version INTEGER NOT NULL REFERENCES persona_versions(version),
    text_json       TEXT NOT NULL, -- ordered JSON array; length 1 renders as a scalar
    tags_json       TEXT NOT NULL DEFAULT '[]',
    rationale       TEXT NOT NULL DEFAULT '',
    confidence      REAL NOT NULL,
    reply_json      TEXT,          -- reply context or NULL
    algo_json       TEXT,          -- algorithm-alignment bundle or NULL
    provider        TEXT NOT NULL,
    model           TEXT NOT NULL,
    prompt_hash     TEXT NOT NULL  -- content-addressed hash of the request
);

-- Reviews are append-only; many rows may reference one draft.
CREATE TABLE IF NOT EXISTS reviews (
    id               TEXT PRIMARY KEY,
    draft_id         TEXT NOT NULL REFERENCES drafts(id),
    created_at       TEXT NOT NULL, -- ISO 8601 UTC; store-assigned
    alignment_score  REAL NOT NULL,
    violations_json  TEXT NOT NULL DEFAULT '[]',
    suggestions_json TEXT NOT NULL DEFAULT '[]',
    revised_text     TEXT,
    algo_json        TEXT
);

CREATE INDEX IF NOT EXISTS records_created_idx ON records(created_at);
CREATE INDEX IF NOT EXISTS records_origin_idx  ON records(origin);
CREATE INDEX IF NOT EXISTS drafts_created_idx  ON drafts(created_at);
CREATE INDEX IF NOT EXISTS reviews_draft_idx   ON reviews(draft_id);

PRAGMA user_version = 1;
";
