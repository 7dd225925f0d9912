//! Interactive session.
//!
//! Everything that touches the [`Session`] happens on this task, one event at
//! a time. Reading stdin, fetching the corpus and writing the clipboard run
//! elsewhere and report back through a channel; notification and "copied"
//! timers are woken with `sleep_until` on the session's next deadline.

use std::{
  future,
  io::Write,
  sync::Arc,
  time::Instant,
};

use anyhow::Result;
use tagsmith_lib::{
  Config,
  Corpus,
  Session,
  clipboard::{
    ClipboardError,
    ClipboardProvider as _,
  },
  session::CopyRequest,
  storage::{
    Storage,
    load_state,
  },
};
use tagsmith_runtime::{
  clipboard::ClipboardProvider,
  corpus::{
    self,
    CorpusSource,
  },
};
use tokio::{
  io::{
    AsyncBufReadExt,
    BufReader,
  },
  sync::mpsc,
};

use crate::{
  input::{
    self,
    Input,
  },
  render::render,
};

#[derive(Debug)]
pub enum AppEvent {
  Line(String),
  Eof,
  CorpusLoaded(anyhow::Result<Corpus>),
  Copied(CopyRequest, Result<(), ClipboardError>),
}

pub struct App<W> {
  session:   Session,
  storage:   Option<Box<dyn Storage>>,
  clipboard: Arc<ClipboardProvider>,
  events:    mpsc::UnboundedSender<AppEvent>,
  out:       W,
}

impl<W: Write> App<W> {
  pub fn new(
    config: Config,
    storage: Option<Box<dyn Storage>>,
    clipboard: ClipboardProvider,
    events: mpsc::UnboundedSender<AppEvent>,
    out: W,
  ) -> Self {
    let mut session = Session::new(config);
    if let Some(storage) = &storage {
      session.restore(load_state(&storage.as_ref()));
    }
    log::info!("using clipboard provider {}", clipboard.name());

    Self {
      session,
      storage,
      clipboard: Arc::new(clipboard),
      events,
      out,
    }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  /// Handles one event. Returns `false` once the session should end.
  pub fn handle(&mut self, event: AppEvent) -> Result<bool> {
    let now = Instant::now();
    match event {
      AppEvent::Line(line) => {
        if !self.handle_line(&line, now)? {
          return Ok(false);
        }
      },
      AppEvent::Eof => return Ok(false),
      AppEvent::CorpusLoaded(result) => self.session.corpus_loaded(result),
      AppEvent::Copied(request, result) => self.session.copy_finished(&request, result, now),
    }

    self.persist();
    render(&self.session, &mut self.out)?;
    Ok(true)
  }

  pub fn tick(&mut self) -> Result<()> {
    if self.session.tick(Instant::now()) {
      render(&self.session, &mut self.out)?;
    }
    Ok(())
  }

  pub fn shutdown(&mut self) {
    self.session.shutdown();
    self.persist();
  }

  fn handle_line(&mut self, line: &str, now: Instant) -> Result<bool> {
    let input = match input::parse(line) {
      Ok(input) => input,
      Err(message) => {
        writeln!(self.out, "{message}")?;
        return Ok(true);
      },
    };

    match input {
      Input::Type(text) => {
        let text = input::append(self.session.raw_input(), &text);
        self.session.set_input(text, now);
      },
      Input::Set(text) => self.session.set_input(text, now),
      Input::Clear => self.session.set_input("", now),
      Input::Delete(index) => {
        if let Err(err) = self.session.delete(index) {
          writeln!(self.out, "{err}")?;
        }
      },
      Input::Accept(index) => match self.session.suggestions().get(index).cloned() {
        Some(tag) => self.session.replace_last_word(&tag, now),
        None => writeln!(self.out, "no suggestion {}", index + 1)?,
      },
      Input::CopyAll => {
        if let Some(request) = self.session.copy_all(now) {
          self.copy(request);
        }
      },
      Input::CopyOne(index) => match self.session.copy_one(index) {
        Ok(request) => self.copy(request),
        Err(err) => writeln!(self.out, "{err}")?,
      },
      Input::Dismiss => {
        self.session.dismiss_notification();
      },
      Input::Show => {},
      Input::Help => writeln!(self.out, "{}", input::HELP)?,
      Input::Quit => return Ok(false),
    }
    Ok(true)
  }

  fn copy(&self, request: CopyRequest) {
    let clipboard = Arc::clone(&self.clipboard);
    let events = self.events.clone();
    tokio::spawn(async move {
      let payload = request.payload.clone();
      let result = tokio::task::spawn_blocking(move || clipboard.set_contents(&payload))
        .await
        .unwrap_or_else(|err| Err(ClipboardError::Platform(err.to_string())));
      events.send(AppEvent::Copied(request, result)).ok();
    });
  }

  fn persist(&self) {
    if let Some(storage) = &self.storage {
      self.session.persist(&storage.as_ref());
    }
  }
}

pub fn spawn_corpus_fetch(source: CorpusSource, events: mpsc::UnboundedSender<AppEvent>) {
  tokio::spawn(async move {
    let result = corpus::fetch(&source).await;
    events.send(AppEvent::CorpusLoaded(result)).ok();
  });
}

pub fn spawn_stdin_reader(events: mpsc::UnboundedSender<AppEvent>) {
  tokio::spawn(async move {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
      match lines.next_line().await {
        Ok(Some(line)) => {
          if events.send(AppEvent::Line(line)).is_err() {
            break;
          }
        },
        Ok(None) => {
          events.send(AppEvent::Eof).ok();
          break;
        },
        Err(err) => {
          log::error!("failed to read stdin: {err}");
          events.send(AppEvent::Eof).ok();
          break;
        },
      }
    }
  });
}

async fn sleep_until(deadline: Option<Instant>) {
  match deadline {
    Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
    None => future::pending().await,
  }
}

pub async fn run<W: Write>(
  mut app: App<W>,
  mut events: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
  render(&app.session, &mut app.out)?;

  loop {
    let deadline = app.session.next_deadline();
    tokio::select! {
      event = events.recv() => {
        let Some(event) = event else {
          break;
        };
        if !app.handle(event)? {
          break;
        }
      },
      _ = sleep_until(deadline) => app.tick()?,
    }
  }

  app.shutdown();
  Ok(())
}

#[cfg(test)]
mod tests {
  use tagsmith_lib::storage::MemoryStorage;
  use tagsmith_runtime::storage::FileStorage;

  use super::*;

  fn app() -> (App<Vec<u8>>, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(
      Config::default(),
      Some(Box::new(MemoryStorage::default())),
      ClipboardProvider::None,
      tx,
      Vec::new(),
    );
    (app, rx)
  }

  fn line(app: &mut App<Vec<u8>>, text: &str) -> bool {
    app.handle(AppEvent::Line(text.to_string())).unwrap()
  }

  #[test]
  fn typing_builds_hashtags() {
    let (mut app, _rx) = app();
    line(&mut app, "cat, dog");
    line(&mut app, "fox");
    assert_eq!(app.session().raw_input(), "cat, dog fox");
    assert_eq!(app.session().hashtags(), ["#cat", "#dog", "#fox"]);
  }

  #[test]
  fn accepting_a_suggestion() {
    let (mut app, _rx) = app();
    app
      .handle(AppEvent::CorpusLoaded(Ok(Corpus::new(["travel", "food"]))))
      .unwrap();
    line(&mut app, "beach trav");
    line(&mut app, ":accept 1");
    assert_eq!(app.session().raw_input(), "beach travel ");
  }

  #[test]
  fn quit_and_eof_end_the_session() {
    let (mut app, _rx) = app();
    assert!(line(&mut app, ":help"));
    assert!(!line(&mut app, ":quit"));
    assert!(!app.handle(AppEvent::Eof).unwrap());
  }

  #[test]
  fn invalid_commands_are_reported_not_fatal() {
    let (mut app, _rx) = app();
    assert!(line(&mut app, ":del 4"));
    let output = String::from_utf8(app.out.clone()).unwrap();
    assert!(output.contains("no hashtag at index 3"));
  }

  #[test]
  fn session_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let open = |dir: &std::path::Path| {
      let (tx, _rx) = mpsc::unbounded_channel();
      App::new(
        Config::default(),
        Some(Box::new(FileStorage::new(dir))),
        ClipboardProvider::None,
        tx,
        Vec::new(),
      )
    };

    let mut first = open(dir.path());
    line(&mut first, "cat, dog");
    line(&mut first, ":del 1");
    first.shutdown();

    let second = open(dir.path());
    assert_eq!(second.session().raw_input(), "dog");
    assert_eq!(second.session().hashtags(), ["#dog"]);
  }

  #[tokio::test]
  async fn copy_failure_comes_back_as_event() {
    let (mut app, mut rx) = app();
    line(&mut app, "a b");
    line(&mut app, ":copy");

    let event = rx.recv().await.unwrap();
    assert!(matches!(event, AppEvent::Copied(_, Err(ClipboardError::Unavailable))));
    app.handle(event).unwrap();
    let notification = app.session().notification().unwrap();
    assert_eq!(notification.message, "Failed to copy hashtags");
  }
}
