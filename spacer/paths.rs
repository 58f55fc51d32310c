use std::path::PathBuf;

use anyhow::{
  Context,
  Result,
};
use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

pub const CONFIG_DIR_ENV: &str = "SPACER_CONFIG_DIR";

pub fn config_dir() -> Result<PathBuf> {
  if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
    return Ok(PathBuf::from(dir));
  }
  let strategy = choose_base_strategy().context("unable to find the config directory")?;
  let mut path = strategy.config_dir();
  path.push("spacer");
  Ok(path)
}

pub fn default_config_file() -> Result<PathBuf> {
  Ok(config_dir()?.join("config.toml"))
}
