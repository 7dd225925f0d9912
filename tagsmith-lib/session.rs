//! State of one editing session.
//!
//! A [`Session`] owns the raw input, the hashtags derived from it, the
//! suggestion state and the live notification. Every operation runs to
//! completion; the two slow platform calls (corpus fetch and clipboard write)
//! are performed by the host, which reports back through
//! [`Session::corpus_loaded`] and [`Session::copy_finished`].
//!
//! Time is never read from the system here. Operations that start a timer
//! take `now`, and the host calls [`Session::tick`] once
//! [`Session::next_deadline`] has passed.

use std::{
  fmt,
  time::{
    Duration,
    Instant,
  },
};

use thiserror::Error;

use crate::{
  clipboard::ClipboardError,
  config::Config,
  format::{
    format,
    join_tags,
    normalize_token,
    split_tokens,
    strip_hash,
  },
  fuzzy::FuzzyMatcher,
  messages::{
    Notification,
    NotificationCenter,
    Severity,
  },
  sanitize::{
    MarkupSanitizer,
    Sanitizer,
  },
  storage::{
    PersistedState,
    Storage,
    save_state,
  },
  suggest::{
    ApproximateMatcher,
    Corpus,
    suggest,
    trailing_word,
  },
  timer::Timers,
};

pub const PLACEHOLDER: &str = "Your generated hashtags will appear here";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("no hashtag at index {index} (list has {len})")]
  IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusState {
  Loading,
  Ready(Corpus),
  Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKey {
  Notification,
  CopiedFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
  All,
  One(usize),
}

/// Text the host should place on the clipboard, and what it was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
  pub target:  CopyTarget,
  pub payload: String,
}

pub struct Session<S = MarkupSanitizer, M = FuzzyMatcher> {
  config:        Config,
  sanitizer:     S,
  matcher:       M,
  raw_input:     String,
  hashtags:      Vec<String>,
  overflowed:    bool,
  corpus:        CorpusState,
  suggestions:   Vec<String>,
  notifications: NotificationCenter,
  timers:        Timers<TimerKey>,
  copied:        Option<usize>,
}

impl Session {
  pub fn new(config: Config) -> Self {
    let matcher = FuzzyMatcher::new(config.fuzzy);
    Self::with_parts(config, MarkupSanitizer, matcher)
  }
}

impl<S: Sanitizer, M: ApproximateMatcher> Session<S, M> {
  pub fn with_parts(config: Config, sanitizer: S, matcher: M) -> Self {
    Self {
      config,
      sanitizer,
      matcher,
      raw_input: String::new(),
      hashtags: Vec::new(),
      overflowed: false,
      corpus: CorpusState::Loading,
      suggestions: Vec::new(),
      notifications: NotificationCenter::default(),
      timers: Timers::new(),
      copied: None,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn raw_input(&self) -> &str {
    &self.raw_input
  }

  pub fn hashtags(&self) -> &[String] {
    &self.hashtags
  }

  pub fn suggestions(&self) -> &[String] {
    &self.suggestions
  }

  pub fn corpus(&self) -> &CorpusState {
    &self.corpus
  }

  pub fn notification(&self) -> Option<&Notification> {
    self.notifications.active()
  }

  pub fn notifications(&self) -> &NotificationCenter {
    &self.notifications
  }

  /// Index of the hashtag copied within the last flash period.
  pub fn copied(&self) -> Option<usize> {
    self.copied
  }

  pub fn is_empty(&self) -> bool {
    self.hashtags.is_empty()
  }

  pub fn placeholder(&self) -> Option<&'static str> {
    self.is_empty().then_some(PLACEHOLDER)
  }

  pub fn can_copy_all(&self) -> bool {
    !self.is_empty()
  }

  /// Restores the last session from storage. A stored list is kept even if it
  /// no longer matches the input; its entries are split, re-normalized and
  /// capped. Only a missing or empty list is derived again from the input.
  pub fn restore(&mut self, state: PersistedState) {
    self.raw_input = state.raw_input;
    self.hashtags = state
      .hashtags
      .iter()
      .flat_map(|tag| split_tokens(tag))
      .filter_map(|token| normalize_token(token, &self.sanitizer))
      .take(self.config.max_hashtags)
      .map(|body| format!("#{body}"))
      .collect();

    let formatted = format(&self.raw_input, self.config.max_hashtags, &self.sanitizer);
    if self.hashtags.is_empty() {
      self.hashtags = formatted.tags;
    }
    self.overflowed = formatted.total > self.config.max_hashtags;
    self.refresh_suggestions();
  }

  pub fn set_input(&mut self, text: impl Into<String>, now: Instant) {
    self.raw_input = text.into();
    self.rederive(now);
  }

  /// Removes the hashtag at `index` from the list, and every token of the
  /// raw input that formats to the same hashtag.
  pub fn delete(&mut self, index: usize) -> Result<String> {
    self.check_index(index)?;
    let removed = self.hashtags.remove(index);
    let bare = strip_hash(&removed);

    let survivors = split_tokens(&self.raw_input)
      .filter(|token| normalize_token(token, &self.sanitizer).as_deref() != Some(bare))
      .collect::<Vec<_>>()
      .join(" ");
    log::debug!("deleted {removed}, input is now {survivors:?}");

    self.raw_input = survivors;
    self.overflowed =
      format(&self.raw_input, self.config.max_hashtags, &self.sanitizer).overflowed();
    self.reset_copied();
    self.refresh_suggestions();
    Ok(removed)
  }

  /// Replaces the word being typed with `tag` and starts a fresh word.
  pub fn replace_last_word(&mut self, tag: &str, now: Instant) {
    let head = match self.raw_input.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
      Some((idx, c)) => &self.raw_input[..idx + c.len_utf8()],
      None => "",
    };
    let text = format!("{head}{tag} ");
    self.set_input(text, now);
  }

  pub fn copy_all(&mut self, now: Instant) -> Option<CopyRequest> {
    if self.hashtags.is_empty() {
      self.notify(Severity::Danger, "No hashtags to copy", now);
      return None;
    }
    Some(CopyRequest {
      target:  CopyTarget::All,
      payload: join_tags(&self.hashtags),
    })
  }

  pub fn copy_one(&self, index: usize) -> Result<CopyRequest> {
    self.check_index(index)?;
    Ok(CopyRequest {
      target:  CopyTarget::One(index),
      payload: self.hashtags[index].clone(),
    })
  }

  /// Reports the outcome of a clipboard write requested earlier. Results are
  /// shown even if the list changed in the meantime.
  pub fn copy_finished(
    &mut self,
    request: &CopyRequest,
    result: std::result::Result<(), ClipboardError>,
    now: Instant,
  ) {
    match (result, request.target) {
      (Ok(()), CopyTarget::All) => {
        let count = request.payload.split(' ').count();
        self.notify(
          Severity::Success,
          format!("Copied {count} hashtags to clipboard"),
          now,
        );
      },
      (Ok(()), CopyTarget::One(index)) => {
        if self.hashtags.get(index) == Some(&request.payload) {
          self.copied = Some(index);
          self
            .timers
            .schedule(TimerKey::CopiedFlash, now + self.config.copied_flash());
        }
        self.notify(Severity::Success, format!("Copied {}", request.payload), now);
      },
      (Err(err), _) => {
        log::warn!("clipboard write failed: {err}");
        self.notify(Severity::Danger, "Failed to copy hashtags", now);
      },
    }
  }

  pub fn corpus_loaded<E: fmt::Display>(&mut self, result: std::result::Result<Corpus, E>) {
    self.corpus = match result {
      Ok(corpus) => {
        log::info!("suggestion corpus loaded with {} tags", corpus.len());
        CorpusState::Ready(corpus)
      },
      Err(err) => {
        log::warn!("suggestions disabled, corpus unavailable: {err}");
        CorpusState::Unavailable
      },
    };
    self.refresh_suggestions();
  }

  pub fn dismiss_notification(&mut self) -> Option<Notification> {
    self.timers.cancel(&TimerKey::Notification);
    self.notifications.dismiss()
  }

  pub fn next_deadline(&self) -> Option<Instant> {
    self.timers.next_deadline()
  }

  /// Fires every timer due at `now`. Returns whether anything changed.
  pub fn tick(&mut self, now: Instant) -> bool {
    let expired = self.timers.take_expired(now);
    for key in &expired {
      match key {
        TimerKey::Notification => {
          self.notifications.dismiss();
        },
        TimerKey::CopiedFlash => self.copied = None,
      }
    }
    !expired.is_empty()
  }

  /// Cancels every pending timer, for when the host goes away.
  pub fn shutdown(&mut self) {
    self.timers.clear();
  }

  pub fn persisted(&self) -> PersistedState {
    PersistedState {
      raw_input: self.raw_input.clone(),
      hashtags:  self.hashtags.clone(),
    }
  }

  pub fn persist(&self, storage: &impl Storage) {
    if let Err(err) = save_state(storage, &self.raw_input, &self.hashtags) {
      log::warn!("failed to persist session: {err}");
    }
  }

  fn check_index(&self, index: usize) -> Result<()> {
    if index >= self.hashtags.len() {
      return Err(SessionError::IndexOutOfRange {
        index,
        len: self.hashtags.len(),
      });
    }
    Ok(())
  }

  fn rederive(&mut self, now: Instant) {
    let max = self.config.max_hashtags;
    let formatted = format(&self.raw_input, max, &self.sanitizer);

    if formatted.overflowed() && !self.overflowed {
      self.notify(Severity::Warning, format!("maximum {max} hashtags"), now);
    }
    self.overflowed = formatted.overflowed();

    if formatted.tags != self.hashtags {
      self.reset_copied();
    }
    self.hashtags = formatted.tags;
    self.refresh_suggestions();
  }

  fn refresh_suggestions(&mut self) {
    self.suggestions = match &self.corpus {
      CorpusState::Ready(corpus) => suggest(
        trailing_word(&self.raw_input),
        corpus,
        self.config.suggestion_limit,
        &mut self.matcher,
      ),
      CorpusState::Loading | CorpusState::Unavailable => Vec::new(),
    };
  }

  fn reset_copied(&mut self) {
    self.copied = None;
    self.timers.cancel(&TimerKey::CopiedFlash);
  }

  fn notify(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
    let lifetime = match severity {
      Severity::Info | Severity::Success => self.config.notify.info_ms,
      Severity::Warning => self.config.notify.warning_ms,
      Severity::Danger => self.config.notify.danger_ms,
    };
    self.notifications.show(severity, message);
    self
      .timers
      .schedule(TimerKey::Notification, now + Duration::from_millis(lifetime));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::{
    MemoryStorage,
    load_state,
  };

  fn session() -> Session {
    Session::new(Config::default())
  }

  fn words(count: usize) -> String {
    (0..count)
      .map(|i| format!("word{i}"))
      .collect::<Vec<_>>()
      .join(", ")
  }

  #[test]
  fn input_derives_hashtags() {
    let mut session = session();
    session.set_input("cat, dog  fox,fox", Instant::now());
    assert_eq!(session.hashtags(), ["#cat", "#dog", "#fox", "#fox"]);
    assert!(session.notification().is_none());
  }

  #[test]
  fn empty_input_shows_placeholder() {
    let mut session = session();
    session.set_input("", Instant::now());
    assert!(session.is_empty());
    assert_eq!(session.placeholder(), Some(PLACEHOLDER));
    assert!(!session.can_copy_all());
  }

  #[test]
  fn overflow_warns_once_per_crossing() {
    let now = Instant::now();
    let mut session = session();

    session.set_input(words(35), now);
    assert_eq!(session.hashtags().len(), 30);
    let warning = session.notification().cloned().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.message, "maximum 30 hashtags");

    session.dismiss_notification();
    session.set_input(words(36), now);
    assert!(session.notification().is_none());

    session.set_input(words(3), now);
    session.set_input(words(31), now);
    assert_eq!(session.notification().unwrap().severity, Severity::Warning);
    assert_eq!(session.notifications().history().count(), 2);
  }

  #[test]
  fn notification_expires() {
    let now = Instant::now();
    let mut session = session();
    session.set_input(words(31), now);
    assert_eq!(session.next_deadline(), Some(now + Duration::from_millis(3000)));

    assert!(!session.tick(now + Duration::from_millis(2999)));
    assert!(session.notification().is_some());
    assert!(session.tick(now + Duration::from_millis(3000)));
    assert!(session.notification().is_none());
  }

  #[test]
  fn newer_notification_restarts_timer() {
    let now = Instant::now();
    let mut session = session();
    session.copy_all(now);
    let later = now + Duration::from_millis(1500);
    session.set_input(words(31), later);
    assert_eq!(session.notification().unwrap().severity, Severity::Warning);
    assert_eq!(
      session.next_deadline(),
      Some(later + Duration::from_millis(3000))
    );
  }

  #[test]
  fn delete_removes_entry_and_every_matching_token() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("fox dog, fox cat", now);

    let removed = session.delete(0).unwrap();
    assert_eq!(removed, "#fox");
    assert_eq!(session.hashtags(), ["#dog", "#fox", "#cat"]);
    assert_eq!(session.raw_input(), "dog cat");

    // The next edit re-derives the list from the input.
    session.set_input("dog cat ", now);
    assert_eq!(session.hashtags(), ["#dog", "#cat"]);
  }

  #[test]
  fn delete_out_of_range() {
    let mut session = session();
    session.set_input("a", Instant::now());
    assert_eq!(
      session.delete(3),
      Err(SessionError::IndexOutOfRange { index: 3, len: 1 })
    );
  }

  #[test]
  fn delete_matches_normalized_tokens() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("#cat <b>cat</b> dog", now);
    session.delete(0).unwrap();
    assert_eq!(session.raw_input(), "dog");
  }

  #[test]
  fn replace_last_word_with_suggestion() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("sunset trav", now);
    session.replace_last_word("travel", now);
    assert_eq!(session.raw_input(), "sunset travel ");
    assert_eq!(session.hashtags(), ["#sunset", "#travel"]);

    session.set_input("trav", now);
    session.replace_last_word("travel", now);
    assert_eq!(session.raw_input(), "travel ");
  }

  #[test]
  fn suggestions_follow_corpus_state() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("trav", now);
    assert!(session.suggestions().is_empty());

    session.corpus_loaded(Ok::<_, String>(Corpus::new([
      "travel",
      "traveling",
      "travels",
    ])));
    assert_eq!(session.suggestions(), ["travel", "travels", "traveling"]);

    session.set_input("trav ", now);
    assert!(session.suggestions().is_empty());
  }

  #[test]
  fn failed_corpus_disables_suggestions_silently() {
    let mut session = session();
    session.corpus_loaded(Err::<Corpus, _>("connection refused"));
    session.set_input("trav", Instant::now());
    assert_eq!(session.corpus(), &CorpusState::Unavailable);
    assert!(session.suggestions().is_empty());
    assert!(session.notification().is_none());
  }

  #[test]
  fn copy_all_payload_and_empty_case() {
    let mut session = session();
    let now = Instant::now();
    assert!(session.copy_all(now).is_none());
    assert_eq!(session.notification().unwrap().severity, Severity::Danger);
    assert_eq!(
      session.next_deadline(),
      Some(now + Duration::from_millis(2100))
    );

    session.set_input("a b", now);
    let request = session.copy_all(now).unwrap();
    assert_eq!(request.payload, "#a #b");
    assert_eq!(request.target, CopyTarget::All);

    session.copy_finished(&request, Ok(()), now);
    assert_eq!(session.notification().unwrap().severity, Severity::Success);
  }

  #[test]
  fn copy_one_flashes_for_a_second() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("a b", now);
    let request = session.copy_one(1).unwrap();
    assert_eq!(request.payload, "#b");

    session.copy_finished(&request, Ok(()), now);
    assert_eq!(session.copied(), Some(1));
    session.tick(now + Duration::from_millis(999));
    assert_eq!(session.copied(), Some(1));
    session.tick(now + Duration::from_millis(1000));
    assert_eq!(session.copied(), None);
  }

  #[test]
  fn clipboard_failure_is_reported() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("a", now);
    let request = session.copy_one(0).unwrap();
    session.copy_finished(&request, Err(ClipboardError::Unavailable), now);
    assert_eq!(session.copied(), None);
    let notification = session.notification().unwrap();
    assert_eq!(notification.severity, Severity::Danger);
  }

  #[test]
  fn persist_and_restore() {
    let storage = MemoryStorage::default();
    let mut first = session();
    first.set_input("cat dog", Instant::now());
    first.persist(&storage);

    let mut second = session();
    second.restore(load_state(&storage));
    assert_eq!(second.raw_input(), "cat dog");
    assert_eq!(second.hashtags(), ["#cat", "#dog"]);
  }

  #[test]
  fn restore_rederives_missing_list() {
    let mut session = session();
    session.restore(PersistedState {
      raw_input: "cat, dog".into(),
      hashtags:  Vec::new(),
    });
    assert_eq!(session.hashtags(), ["#cat", "#dog"]);
  }

  #[test]
  fn restore_keeps_a_stored_list_that_differs_from_input() {
    let mut session = session();
    session.restore(PersistedState {
      raw_input: "cat dog".into(),
      hashtags:  vec!["#x".into()],
    });
    assert_eq!(session.raw_input(), "cat dog");
    assert_eq!(session.hashtags(), ["#x"]);
  }

  #[test]
  fn restore_splits_stored_entries() {
    let mut session = session();
    session.restore(PersistedState {
      raw_input: "a b".into(),
      hashtags:  vec!["#a b".into(), "##c,".into(), "<b></b>".into()],
    });
    assert_eq!(session.hashtags(), ["#a", "#b", "#c"]);

    let request = session.copy_all(Instant::now()).unwrap();
    session.copy_finished(&request, Ok(()), Instant::now());
    assert_eq!(
      session.notification().unwrap().message,
      "Copied 3 hashtags to clipboard"
    );
  }

  #[test]
  fn copy_flash_skipped_when_list_changed() {
    let mut session = session();
    let now = Instant::now();
    session.set_input("a b", now);
    let request = session.copy_one(1).unwrap();

    session.set_input("c d", now);
    session.copy_finished(&request, Ok(()), now);
    assert_eq!(session.copied(), None);
    assert_eq!(session.notification().unwrap().message, "Copied #b");
    assert_eq!(
      session.next_deadline(),
      Some(now + Duration::from_millis(3000))
    );
  }

  #[test]
  fn shutdown_cancels_timers() {
    let mut session = session();
    let now = Instant::now();
    session.copy_all(now);
    assert!(session.next_deadline().is_some());
    session.shutdown();
    assert!(session.next_deadline().is_none());
  }
}
