//! Client-local persistence of the last session.
//!
//! Two string slots are kept: the raw input and the derived hashtag list as a
//! JSON array. Storage is a cache for reload resilience; nothing read from it
//! is trusted and no read or write failure reaches the user.

use std::{
  cell::RefCell,
  collections::HashMap,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  RawInput,
  Hashtags,
}

impl Slot {
  pub const ALL: [Slot; 2] = [Slot::RawInput, Slot::Hashtags];

  pub fn key(self) -> &'static str {
    match self {
      Slot::RawInput => "hashtag-input",
      Slot::Hashtags => "hashtag-list",
    }
  }
}

#[derive(Debug, Error)]
pub enum StorageError {
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("failed to serialize hashtags: {0}")]
  Serialize(#[from] serde_json::Error),
}

pub trait Storage {
  fn read(&self, slot: Slot) -> Option<String>;
  fn write(&self, slot: Slot, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
  fn read(&self, slot: Slot) -> Option<String> {
    (**self).read(slot)
  }

  fn write(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
    (**self).write(slot, value)
  }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  slots: RefCell<HashMap<Slot, String>>,
}

impl Storage for MemoryStorage {
  fn read(&self, slot: Slot) -> Option<String> {
    self.slots.borrow().get(&slot).cloned()
  }

  fn write(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
    self.slots.borrow_mut().insert(slot, value.to_string());
    Ok(())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
  pub raw_input: String,
  pub hashtags:  Vec<String>,
}

/// Reads the last session. Missing slots are empty and a stored list that is
/// not a JSON array of strings is treated as empty.
pub fn load_state(storage: &impl Storage) -> PersistedState {
  let raw_input = storage.read(Slot::RawInput).unwrap_or_default();
  let hashtags = match storage.read(Slot::Hashtags) {
    Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
      log::warn!("ignoring unreadable stored hashtags: {err}");
      Vec::new()
    }),
    None => Vec::new(),
  };

  PersistedState {
    raw_input,
    hashtags,
  }
}

pub fn save_state(
  storage: &impl Storage,
  raw_input: &str,
  hashtags: &[String],
) -> Result<(), StorageError> {
  storage.write(Slot::RawInput, raw_input)?;
  storage.write(Slot::Hashtags, &serde_json::to_string(hashtags)?)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_storage_loads_empty_state() {
    assert_eq!(load_state(&MemoryStorage::default()), PersistedState::default());
  }

  #[test]
  fn state_survives_save_and_load() {
    let storage = MemoryStorage::default();
    let tags = vec!["#cat".to_string(), "#dog".to_string()];
    save_state(&storage, "cat dog", &tags).unwrap();

    assert_eq!(storage.read(Slot::Hashtags).as_deref(), Some(r##"["#cat","#dog"]"##));
    let state = load_state(&storage);
    assert_eq!(state.raw_input, "cat dog");
    assert_eq!(state.hashtags, tags);
  }

  #[test]
  fn corrupt_hashtag_list_is_empty() {
    let storage = MemoryStorage::default();
    storage.write(Slot::RawInput, "cat").unwrap();
    storage.write(Slot::Hashtags, "{not json").unwrap();
    let state = load_state(&storage);
    assert_eq!(state.raw_input, "cat");
    assert!(state.hashtags.is_empty());

    storage.write(Slot::Hashtags, r#"{"a": 1}"#).unwrap();
    assert!(load_state(&storage).hashtags.is_empty());
  }
}
