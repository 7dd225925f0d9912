use std::path::Path;

use anyhow::{
  Context,
  Result,
};
use tagsmith_lib::Config;

/// Built-in config.toml.
pub fn default_config() -> Result<toml::Value> {
  let default_config = include_str!("config.toml");
  toml::from_str(default_config).context("failed to parse built-in config.toml")
}

/// User config.toml merged over the built-in one. A missing file is not an
/// error.
pub fn user_config(path: &Path) -> Result<toml::Value> {
  let default = default_config()?;
  let user = match std::fs::read_to_string(path) {
    Ok(content) => toml::from_str(&content)
      .with_context(|| format!("failed to parse {}", path.display()))?,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
      log::debug!("no user config at {}", path.display());
      return Ok(default);
    },
    Err(err) => {
      return Err(err).with_context(|| format!("failed to read {}", path.display()));
    },
  };

  Ok(crate::merge_toml_values(default, user, 3))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
  let value = user_config(path)?;
  let config: Config = value
    .try_into()
    .with_context(|| format!("invalid configuration in {}", path.display()))?;
  config
    .validate()
    .with_context(|| format!("invalid configuration in {}", path.display()))?;
  Ok(config)
}

/// Loads the config file chosen by [`crate::initialize_config_file`].
pub fn load_config() -> Result<Config> {
  load_config_from(&crate::config_file())
}
