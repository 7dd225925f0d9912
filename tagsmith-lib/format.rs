//! Text to hashtag conversion.
//!
//! The whole list is re-derived from the raw text on every change; inputs are
//! small and the pass is linear in the length of the text.

use crate::sanitize::Sanitizer;

/// Result of formatting a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatted {
  pub tags:  Vec<String>,
  /// Number of usable tokens before truncation.
  pub total: usize,
}

impl Formatted {
  pub fn overflowed(&self) -> bool {
    self.total > self.tags.len()
  }
}

pub fn is_separator(c: char) -> bool {
  c.is_whitespace() || c == ','
}

/// Splits on runs of whitespace and commas. Never yields empty tokens.
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
  text.split(is_separator).filter(|token| !token.is_empty())
}

/// Removes every leading `#`.
pub fn strip_hash(tag: &str) -> &str {
  tag.trim_start_matches('#')
}

/// Turns a single raw token into the bare body of a hashtag, or `None` if
/// nothing survives trimming and sanitizing.
pub fn normalize_token(token: &str, sanitizer: &impl Sanitizer) -> Option<String> {
  let sanitized = sanitizer.sanitize(token.trim());
  let body = strip_hash(sanitized.trim()).trim();
  (!body.is_empty()).then(|| body.to_string())
}

/// Formats `text` into at most `max_count` hashtags in order of first
/// appearance. Duplicates are kept.
pub fn format(text: &str, max_count: usize, sanitizer: &impl Sanitizer) -> Formatted {
  let mut formatted = Formatted::default();
  for body in split_tokens(text).filter_map(|token| normalize_token(token, sanitizer)) {
    formatted.total += 1;
    if formatted.tags.len() < max_count {
      formatted.tags.push(format!("#{body}"));
    }
  }
  formatted
}

/// Clipboard payload for a list of hashtags.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
  tags
    .iter()
    .map(AsRef::as_ref)
    .collect::<Vec<_>>()
    .join(" ")
}
