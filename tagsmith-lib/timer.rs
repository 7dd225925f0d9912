//! Deadlines driven by the host event loop.
//!
//! The session never sleeps. It records when something should happen and the
//! host wakes it up at [`Timers::next_deadline`], calling
//! [`Timers::take_expired`] with the current time.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Timers<K> {
  pending: Vec<(K, Instant)>,
}

impl<K> Default for Timers<K> {
  fn default() -> Self {
    Self {
      pending: Vec::new(),
    }
  }
}

impl<K: PartialEq + Clone> Timers<K> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Schedules `key` for `deadline`, replacing any deadline already set for
  /// the same key.
  pub fn schedule(&mut self, key: K, deadline: Instant) {
    self.cancel(&key);
    self.pending.push((key, deadline));
  }

  pub fn cancel(&mut self, key: &K) -> bool {
    let before = self.pending.len();
    self.pending.retain(|(pending, _)| pending != key);
    self.pending.len() != before
  }

  pub fn clear(&mut self) {
    self.pending.clear();
  }

  pub fn is_scheduled(&self, key: &K) -> bool {
    self.pending.iter().any(|(pending, _)| pending == key)
  }

  pub fn next_deadline(&self) -> Option<Instant> {
    self.pending.iter().map(|(_, deadline)| *deadline).min()
  }

  /// Removes and returns every key due at `now`, earliest first.
  pub fn take_expired(&mut self, now: Instant) -> Vec<K> {
    let mut expired = Vec::new();
    self.pending.retain(|(key, deadline)| {
      if *deadline <= now {
        expired.push((key.clone(), *deadline));
        false
      } else {
        true
      }
    });
    expired.sort_by_key(|(_, deadline)| *deadline);
    expired.into_iter().map(|(key, _)| key).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }
}
