//! Approximate matching of a partially typed word against known tags.
//!
//! [`FuzzyMatcher`] combines two measures and keeps the better one:
//!
//! - a [`nucleo`] fuzzy score, normalized against the score the word would get
//!   against itself, plus a proximity penalty for matches that start far from
//!   the beginning of the tag;
//! - the edit distance ([`strsim::levenshtein`]) between the word and an
//!   equally long window of the tag, relative to the word length, plus the
//!   window's offset relative to `distance`.
//!
//! The first catches abbreviations and partial words (`trvl` -> `travel`), the
//! second catches substitutions nucleo cannot see (`trabel` -> `travel`) and
//! words found a few characters into the tag (`vel` -> `travel`).
//! Scores run from 0.0 (exact) to 1.0; anything above the configured
//! threshold is not a match.
//!
//! # Examples
//!
//! ```
//! use tagsmith_lib::{
//!   config::FuzzyConfig,
//!   fuzzy::FuzzyMatcher,
//!   suggest::ApproximateMatcher,
//! };
//!
//! let mut matcher = FuzzyMatcher::new(FuzzyConfig::default());
//! assert_eq!(matcher.score("trav", "travel"), Some(0.0));
//! assert!(matcher.score("trav", "sunset").is_none());
//! ```

use nucleo::{
  Config,
  Matcher,
  Utf32Str,
  pattern::{
    Atom,
    AtomKind,
    CaseMatching,
    Normalization,
  },
};

use crate::{
  config::FuzzyConfig,
  suggest::ApproximateMatcher,
};

pub struct FuzzyMatcher {
  matcher:  Matcher,
  config:   FuzzyConfig,
  needle:   Vec<char>,
  haystack: Vec<char>,
  indices:  Vec<u32>,
}

impl FuzzyMatcher {
  pub fn new(config: FuzzyConfig) -> Self {
    Self {
      matcher: Matcher::new(Config::DEFAULT),
      config,
      needle: Vec::new(),
      haystack: Vec::new(),
      indices: Vec::new(),
    }
  }

  pub fn config(&self) -> FuzzyConfig {
    self.config
  }

  fn nucleo_score(&mut self, needle: &str, haystack: &str) -> Option<f64> {
    let atom = Atom::new(
      needle,
      CaseMatching::Ignore,
      Normalization::Smart,
      AtomKind::Fuzzy,
      false,
    );

    let perfect = atom.score(Utf32Str::new(needle, &mut self.needle), &mut self.matcher)?;
    if perfect == 0 {
      return None;
    }

    self.indices.clear();
    let score = atom.indices(
      Utf32Str::new(haystack, &mut self.haystack),
      &mut self.matcher,
      &mut self.indices,
    )?;

    let closeness = (1.0 - f64::from(score) / f64::from(perfect)).clamp(0.0, 1.0);
    let offset = self.indices.iter().min().copied().unwrap_or(0);
    let proximity = f64::from(offset) / self.config.distance.max(1) as f64;
    Some(closeness + proximity)
  }

  /// Best edit distance between the word and any equally long window of the
  /// tag starting within `distance` characters, plus the same proximity
  /// penalty nucleo matches pay.
  fn edit_score(&self, needle: &str, haystack: &str) -> f64 {
    let needle = needle.to_lowercase();
    let width = needle.chars().count();
    let haystack = haystack.to_lowercase().chars().collect::<Vec<_>>();
    let distance = self.config.distance.max(1);
    let last_offset = haystack.len().saturating_sub(width).min(distance);

    (0..=last_offset)
      .map(|offset| {
        let window = haystack[offset..]
          .iter()
          .take(width)
          .collect::<String>();
        let errors = strsim::levenshtein(&needle, &window) as f64 / width as f64;
        errors + offset as f64 / distance as f64
      })
      .fold(f64::INFINITY, f64::min)
  }
}

impl ApproximateMatcher for FuzzyMatcher {
  fn score(&mut self, needle: &str, haystack: &str) -> Option<f64> {
    if needle.is_empty() || haystack.is_empty() {
      return None;
    }

    let fuzzy = self.nucleo_score(needle, haystack);
    let edit = self.edit_score(needle, haystack);
    let best = fuzzy.map_or(edit, |fuzzy| fuzzy.min(edit));
    (best <= self.config.threshold).then_some(best)
  }
}
