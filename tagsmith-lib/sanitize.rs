//! Markup stripping for individual tokens.
//!
//! Tokens end up rendered as chips and copied to the clipboard, so anything
//! that looks like markup is removed before a token becomes a hashtag. The
//! formatter only sees the [`Sanitizer`] trait; hosts may plug in another
//! implementation, e.g. one backed by `ammonia` with an empty tag allowlist.
//! [`MarkupSanitizer`] never leaves a `<` or `>` in its output.

use std::{
  borrow::Cow,
  sync::LazyLock,
};

use regex::Regex;

pub trait Sanitizer {
  fn sanitize<'a>(&self, token: &'a str) -> Cow<'a, str>;
}

impl<S: Sanitizer + ?Sized> Sanitizer for Box<S> {
  fn sanitize<'a>(&self, token: &'a str) -> Cow<'a, str> {
    (**self).sanitize(token)
  }
}

impl<S: Sanitizer + ?Sized> Sanitizer for &S {
  fn sanitize<'a>(&self, token: &'a str) -> Cow<'a, str> {
    (**self).sanitize(token)
  }
}

static EXECUTABLE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<(script|style)\b[^>]*>.*?(</(script|style)\s*>|$)")
    .expect("static regex is valid")
});

static TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<[^<>]*>").expect("static regex is valid"));

/// Removes script/style elements with their content, every other tag, and
/// whatever `<` / `>` is left over. Text inside benign tags is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupSanitizer;

impl Sanitizer for MarkupSanitizer {
  fn sanitize<'a>(&self, token: &'a str) -> Cow<'a, str> {
    if !token.contains(['<', '>']) {
      return Cow::Borrowed(token);
    }

    let without_scripts = EXECUTABLE_ELEMENT.replace_all(token, "");
    let without_tags = TAG.replace_all(&without_scripts, "");
    Cow::Owned(without_tags.replace(['<', '>'], ""))
  }
}

/// Leaves tokens untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughSanitizer;

impl Sanitizer for PassthroughSanitizer {
  fn sanitize<'a>(&self, token: &'a str) -> Cow<'a, str> {
    Cow::Borrowed(token)
  }
}
