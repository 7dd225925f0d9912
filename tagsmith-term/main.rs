//! Command-line front end for tagsmith.
//!
//! `tagsmith format` and `tagsmith suggest` are one-shot; without a
//! subcommand an interactive session reads lines from stdin.

mod app;
mod cli;
mod input;
mod render;

use std::{
  io::{
    self,
    Read,
  },
  path::Path,
};

use anyhow::{
  Context,
  Result,
};
use clap::Parser;
use tagsmith_lib::{
  Config,
  format::{
    self,
    join_tags,
  },
  fuzzy::FuzzyMatcher,
  sanitize::MarkupSanitizer,
  storage::Storage,
  suggest::suggest,
};
use tagsmith_loader::config;
use tagsmith_runtime::{
  clipboard::ClipboardProvider,
  corpus,
  storage::FileStorage,
};
use tokio::sync::mpsc;

use crate::cli::{
  Cli,
  Command,
};

fn setup_logging(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level)
    .chain(fern::log_file(tagsmith_loader::log_file())?)
    .apply()?;

  Ok(())
}

fn load_config(path: Option<&Path>, max_hashtags: Option<usize>) -> Result<Config> {
  tagsmith_loader::initialize_config_file(path.map(Path::to_path_buf));

  let mut config = match config::load_config() {
    Ok(config) => config,
    Err(err) => {
      eprintln!("Bad config: {err:#}");
      eprintln!("Using default configuration");
      log::warn!("bad config: {err:#}");
      Config::default()
    },
  };

  if let Some(max) = max_hashtags {
    config.max_hashtags = max;
  }
  config.validate().context("invalid configuration")?;
  Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("failed to start async runtime")
}

fn format_command(config: &Config, json: bool, text: Vec<String>) -> Result<()> {
  let text = if text.is_empty() {
    let mut buf = String::new();
    io::stdin()
      .read_to_string(&mut buf)
      .context("failed to read stdin")?;
    buf
  } else {
    text.join(" ")
  };

  let formatted = format::format(&text, config.max_hashtags, &MarkupSanitizer);
  if formatted.overflowed() {
    eprintln!(
      "warning: {} hashtags found, keeping the first {}",
      formatted.total, config.max_hashtags
    );
  }

  if json {
    println!("{}", serde_json::to_string(&formatted.tags)?);
  } else {
    println!("{}", join_tags(&formatted.tags));
  }
  Ok(())
}

fn suggest_command(
  config: &Config,
  word: &str,
  source: &corpus::CorpusSource,
  limit: Option<usize>,
) -> Result<()> {
  let corpus = runtime()?.block_on(corpus::fetch(source))?;
  let mut matcher = FuzzyMatcher::new(config.fuzzy);
  let limit = limit.unwrap_or(config.suggestion_limit);

  for tag in suggest(word, &corpus, limit, &mut matcher) {
    println!("{tag}");
  }
  Ok(())
}

fn session_command(
  config: Config,
  source: Option<corpus::CorpusSource>,
  no_persist: bool,
) -> Result<()> {
  let storage: Option<Box<dyn Storage>> = if no_persist {
    None
  } else {
    Some(Box::new(FileStorage::new(tagsmith_loader::state_dir())))
  };
  let clipboard = ClipboardProvider::detect();

  runtime()?.block_on(async move {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = app::App::new(config, storage, clipboard, tx.clone(), io::stdout());

    match source {
      Some(source) => app::spawn_corpus_fetch(source, tx.clone()),
      None => {
        tx.send(app::AppEvent::CorpusLoaded(Err(anyhow::anyhow!(
          "no corpus configured"
        ))))
        .ok();
      },
    }
    app::spawn_stdin_reader(tx);

    app::run(app, rx).await
  })
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tagsmith_loader::initialize_log_file(cli.log_file.clone());
  setup_logging(cli.verbosity).context("failed to initialize logging")?;

  let config = load_config(cli.config_file.as_deref(), cli.max_hashtags)?;

  match cli.command.unwrap_or_default() {
    Command::Format { json, text } => format_command(&config, json, text),
    Command::Suggest {
      word,
      corpus,
      limit,
    } => suggest_command(&config, &word, &corpus, limit),
    Command::Session { corpus, no_persist } => session_command(config, corpus, no_persist),
  }
}
