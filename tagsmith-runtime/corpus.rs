//! Fetching the suggestion corpus.
//!
//! The corpus is a JSON array of tag strings, read from a local file or an
//! http(s) endpoint. It is fetched once; there is no retry and no timeout, a
//! failure simply leaves suggestions disabled.

use std::{
  fmt,
  path::PathBuf,
  str::FromStr,
};

use anyhow::{
  Context,
  Result,
};
use tagsmith_lib::Corpus;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
  File(PathBuf),
  Http(Url),
}

impl FromStr for CorpusSource {
  type Err = url::ParseError;

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    if value.starts_with("http://") || value.starts_with("https://") {
      return Url::parse(value).map(Self::Http);
    }
    Ok(Self::File(PathBuf::from(value)))
  }
}

impl fmt::Display for CorpusSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::File(path) => write!(f, "{}", path.display()),
      Self::Http(url) => write!(f, "{url}"),
    }
  }
}

pub async fn fetch(source: &CorpusSource) -> Result<Corpus> {
  let bytes = match source {
    CorpusSource::File(path) => tokio::fs::read(path)
      .await
      .with_context(|| format!("failed to read corpus from {}", path.display()))?,
    CorpusSource::Http(url) => reqwest::get(url.clone())
      .await
      .and_then(reqwest::Response::error_for_status)
      .with_context(|| format!("failed to fetch corpus from {url}"))?
      .bytes()
      .await
      .with_context(|| format!("failed to read corpus body from {url}"))?
      .to_vec(),
  };

  let corpus =
    Corpus::from_json(&bytes).with_context(|| format!("unusable corpus from {source}"))?;
  log::debug!("fetched {} tags from {source}", corpus.len());
  Ok(corpus)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_sources() {
    assert_eq!(
      "tags.json".parse::<CorpusSource>().unwrap(),
      CorpusSource::File(PathBuf::from("tags.json"))
    );
    assert!(matches!(
      "https://example.com/tags.json".parse::<CorpusSource>().unwrap(),
      CorpusSource::Http(_)
    ));
    assert!("http://".parse::<CorpusSource>().is_err());
  }

  #[tokio::test]
  async fn fetch_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tags.json");
    std::fs::write(&path, r#"["travel", "traveling", "travels"]"#).unwrap();

    let corpus = fetch(&CorpusSource::File(path)).await.unwrap();
    assert_eq!(corpus.len(), 3);
  }

  #[tokio::test]
  async fn malformed_corpus_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tags.json");
    std::fs::write(&path, r#"{"tags": []}"#).unwrap();

    assert!(fetch(&CorpusSource::File(path)).await.is_err());
    assert!(
      fetch(&CorpusSource::File(dir.path().join("missing.json")))
        .await
        .is_err()
    );
  }
}
