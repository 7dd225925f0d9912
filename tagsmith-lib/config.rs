//! Session configuration.
//!
//! Limits, timings and the chip palette are carried by an explicit [`Config`]
//! value handed to the [`Session`](crate::Session) at construction. The loader
//! crate deserializes it from `config.toml`; every field has a default so a
//! partial file is fine.

use std::time::Duration;

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

pub const DEFAULT_MAX_HASHTAGS: usize = 30;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("max-hashtags must be at least 1")]
  ZeroMaxHashtags,
  #[error("fuzzy threshold must be within 0.0..=1.0, got {0}")]
  ThresholdOutOfRange(f64),
  #[error("fuzzy distance must be at least 1")]
  ZeroDistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
  pub max_hashtags:     usize,
  pub suggestion_limit: usize,
  pub fuzzy:            FuzzyConfig,
  pub notify:           NotifyConfig,
  pub copied_flash_ms:  u64,
  pub palette:          Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FuzzyConfig {
  /// 0.0 only accepts exact matches, 1.0 accepts anything.
  pub threshold: f64,
  /// Number of characters over which a match drifting away from the start of
  /// a tag is penalized.
  pub distance:  usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct NotifyConfig {
  pub info_ms:    u64,
  pub warning_ms: u64,
  pub danger_ms:  u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      max_hashtags:     DEFAULT_MAX_HASHTAGS,
      suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
      fuzzy:            FuzzyConfig::default(),
      notify:           NotifyConfig::default(),
      copied_flash_ms:  1000,
      palette:          ["blue", "green", "magenta", "yellow", "cyan", "red"]
        .into_iter()
        .map(String::from)
        .collect(),
    }
  }
}

impl Default for FuzzyConfig {
  fn default() -> Self {
    Self {
      threshold: 0.2,
      distance:  30,
    }
  }
}

impl Default for NotifyConfig {
  fn default() -> Self {
    Self {
      info_ms:    3000,
      warning_ms: 3000,
      danger_ms:  2100,
    }
  }
}

impl Config {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_hashtags == 0 {
      return Err(ConfigError::ZeroMaxHashtags);
    }
    if !(0.0..=1.0).contains(&self.fuzzy.threshold) {
      return Err(ConfigError::ThresholdOutOfRange(self.fuzzy.threshold));
    }
    if self.fuzzy.distance == 0 {
      return Err(ConfigError::ZeroDistance);
    }
    Ok(())
  }

  /// Colour of the chip at `index`, cycling through the palette.
  pub fn chip_color(&self, index: usize) -> Option<&str> {
    if self.palette.is_empty() {
      return None;
    }
    Some(self.palette[index % self.palette.len()].as_str())
  }

  pub fn copied_flash(&self) -> Duration {
    Duration::from_millis(self.copied_flash_ms)
  }
}
