//! Application settings: optional TOML file merged with `VOXPRINT_*`
//! environment variables. Nested keys use `__` in the environment, e.g.
//! `VOXPRINT_LLM__PROVIDER=local`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use voxprint_llm::LlmSettings;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub db_path: PathBuf,
  pub host:    String,
  pub port:    u16,
  pub llm:     LlmSettings,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      db_path: PathBuf::from("./data/voxprint.sqlite"),
      host:    "127.0.0.1".to_string(),
      port:    8765,
      llm:     LlmSettings::default(),
    }
  }
}

impl Settings {
  pub fn load(config_path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(config_path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("VOXPRINT").separator("__"),
      )
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf {
    expand_tilde(&self.db_path)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
