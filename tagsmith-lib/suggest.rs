//! Suggestions for the word currently being typed.

use std::cmp::Ordering;

use thiserror::Error;

use crate::format::strip_hash;

/// Approximate string comparison used to rank corpus tags.
pub trait ApproximateMatcher {
  /// Scores `haystack` against `needle` between 0.0 (exact) and 1.0. `None`
  /// means the pair does not match within the matcher's threshold.
  fn score(&mut self, needle: &str, haystack: &str) -> Option<f64>;
}

impl<M: ApproximateMatcher + ?Sized> ApproximateMatcher for Box<M> {
  fn score(&mut self, needle: &str, haystack: &str) -> Option<f64> {
    (**self).score(needle, haystack)
  }
}

#[derive(Debug, Error)]
pub enum CorpusError {
  #[error("corpus is not a JSON array of strings: {0}")]
  Malformed(#[from] serde_json::Error),
}

/// Known tags to suggest from. Loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
  tags: Vec<String>,
}

impl Corpus {
  pub fn new(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      tags: tags
        .into_iter()
        .map(Into::into)
        .filter(|tag: &String| !tag.trim().is_empty())
        .collect(),
    }
  }

  pub fn from_json(bytes: &[u8]) -> Result<Self, CorpusError> {
    let tags: Vec<String> = serde_json::from_slice(bytes)?;
    Ok(Self::new(tags))
  }

  pub fn tags(&self) -> &[String] {
    &self.tags
  }

  pub fn len(&self) -> usize {
    self.tags.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tags.is_empty()
  }
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

/// The word at the very end of `text`, including a single leading `#` if
/// present. Empty when the text ends in anything but a word character.
pub fn trailing_word(text: &str) -> &str {
  let start = text
    .char_indices()
    .rev()
    .take_while(|&(_, c)| is_word_char(c))
    .last()
    .map(|(idx, _)| idx);

  match start {
    Some(start) if text[..start].ends_with('#') => &text[start - 1..],
    Some(start) => &text[start..],
    None => "",
  }
}

/// Ranks corpus tags against `word`, best first, returning at most `limit`.
pub fn suggest(
  word: &str,
  corpus: &Corpus,
  limit: usize,
  matcher: &mut impl ApproximateMatcher,
) -> Vec<String> {
  let needle = strip_hash(word);
  if needle.is_empty() || limit == 0 {
    return Vec::new();
  }

  let mut scored = corpus
    .tags()
    .iter()
    .filter_map(|tag| matcher.score(needle, tag).map(|score| (score, tag)))
    .collect::<Vec<_>>();

  // Stable sort: equal scores prefer the shorter tag, then corpus order.
  scored.sort_by(|(a, a_tag), (b, b_tag)| {
    a.partial_cmp(b)
      .unwrap_or(Ordering::Equal)
      .then_with(|| a_tag.chars().count().cmp(&b_tag.chars().count()))
  });

  scored
    .into_iter()
    .take(limit)
    .map(|(_, tag)| tag.clone())
    .collect()
}
