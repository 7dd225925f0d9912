use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
  Subcommand,
};
use tagsmith_runtime::corpus::CorpusSource;

#[derive(Parser, Debug)]
#[command(
  name = "tagsmith",
  about = "Turn free text into hashtags",
  version,
  long_about = None
)]
pub struct Cli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count, global = true)]
  pub verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE", global = true)]
  pub log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
  pub config_file: Option<PathBuf>,

  /// Override the maximum number of hashtags
  #[arg(long = "max", value_name = "N", global = true)]
  pub max_hashtags: Option<usize>,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Format text (arguments, or stdin) into hashtags
  Format {
    /// Print a JSON array instead of a space separated line
    #[arg(long)]
    json: bool,

    text: Vec<String>,
  },
  /// Suggest known tags for a partially typed word
  Suggest {
    word: String,

    /// JSON array of known tags (file path or http(s) URL)
    #[arg(long, value_name = "SOURCE")]
    corpus: CorpusSource,

    /// Maximum number of suggestions
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
  },
  /// Interactive session reading commands from stdin (the default)
  Session {
    /// JSON array of known tags (file path or http(s) URL)
    #[arg(long, value_name = "SOURCE")]
    corpus: Option<CorpusSource>,

    /// Do not restore or save the previous session
    #[arg(long)]
    no_persist: bool,
  },
}

impl Default for Command {
  fn default() -> Self {
    Self::Session {
      corpus:     None,
      no_persist: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["tagsmith", "format", "--max", "3", "-vv", "a", "b"]).unwrap();
    assert_eq!(cli.max_hashtags, Some(3));
    assert_eq!(cli.verbosity, 2);
    match cli.command {
      Some(Command::Format { json, text }) => {
        assert!(!json);
        assert_eq!(text, ["a", "b"]);
      },
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn suggest_parses_corpus_source() {
    let cli =
      Cli::try_parse_from(["tagsmith", "suggest", "trav", "--corpus", "tags.json"]).unwrap();
    assert!(matches!(
      cli.command,
      Some(Command::Suggest {
        corpus: CorpusSource::File(_),
        ..
      })
    ));
  }
}
