//! Session state kept on disk, one file per slot.

use std::{
  io::Write,
  path::{
    Path,
    PathBuf,
  },
};

use tagsmith_lib::storage::{
  Slot,
  Storage,
  StorageError,
};

#[derive(Debug, Clone)]
pub struct FileStorage {
  dir: PathBuf,
}

impl FileStorage {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn path(&self, slot: Slot) -> PathBuf {
    self.dir.join(slot.key())
  }
}

impl Storage for FileStorage {
  fn read(&self, slot: Slot) -> Option<String> {
    let path = self.path(slot);
    match std::fs::read_to_string(&path) {
      Ok(value) => Some(value),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
      Err(err) => {
        log::warn!("failed to read {}: {err}", path.display());
        None
      },
    }
  }

  /// Writes through a temporary file in the same directory so a crash never
  /// leaves a half-written slot behind.
  fn write(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
    std::fs::create_dir_all(&self.dir)?;
    let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
    file.write_all(value.as_bytes())?;
    file.persist(self.path(slot)).map_err(|err| err.error)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tagsmith_lib::storage::{
    load_state,
    save_state,
  };

  use super::*;

  #[test]
  fn missing_directory_reads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("state"));
    assert_eq!(storage.read(Slot::RawInput), None);
    assert!(load_state(&storage).hashtags.is_empty());
  }

  #[test]
  fn slots_are_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("state"));
    save_state(&storage, "cat, dog", &["#cat".into(), "#dog".into()]).unwrap();

    assert_eq!(
      std::fs::read_to_string(dir.path().join("state").join("hashtag-input")).unwrap(),
      "cat, dog"
    );
    let state = load_state(&storage);
    assert_eq!(state.raw_input, "cat, dog");
    assert_eq!(state.hashtags, ["#cat", "#dog"]);
  }

  #[test]
  fn overwrite_replaces_value() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.write(Slot::RawInput, "first").unwrap();
    storage.write(Slot::RawInput, "second").unwrap();
    assert_eq!(storage.read(Slot::RawInput).as_deref(), Some("second"));
  }
}
