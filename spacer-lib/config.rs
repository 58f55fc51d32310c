use std::{
  fs,
  io::{
    Error as IOError,
    ErrorKind,
  },
  path::{
    Path,
    PathBuf,
  },
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;
use toml::de::Error as TomlError;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Io {
    path:   PathBuf,
    source: IOError,
  },
  #[error("bad config: {0}")]
  Parse(#[from] TomlError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SpacerConfig {
  /// Expand tags at all.
  pub enabled: bool,
  pub insert:  InsertConfig,
}

impl Default for SpacerConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      insert:  InsertConfig::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct InsertConfig {
  /// Start a new undo step for an expansion. When off, undoing an expansion
  /// also undoes the keystroke that triggered it.
  pub undo_stop_before: bool,
}

impl Default for InsertConfig {
  fn default() -> Self {
    Self {
      undo_stop_before: true,
    }
  }
}

impl SpacerConfig {
  pub fn from_toml(source: &str) -> Result<Self> {
    Ok(toml::from_str(source)?)
  }

  /// Load the config at `path`. A missing file is the default config.
  pub fn load(path: &Path) -> Result<Self> {
    match fs::read_to_string(path) {
      Ok(source) => Self::from_toml(&source),
      Err(err) if err.kind() == ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Self::default())
      },
      Err(source) => {
        Err(ConfigError::Io {
          path: path.to_path_buf(),
          source,
        })
      },
    }
  }
}
