use std::io::{
  self,
  Write,
};

use crossterm::style::{
  Color,
  Stylize,
};
use tagsmith_lib::{
  Session,
  messages::Severity,
  session::CorpusState,
};

fn chip_color(name: Option<&str>) -> Color {
  name
    .and_then(|name| Color::try_from(name).ok())
    .unwrap_or(Color::Reset)
}

fn severity_color(severity: Severity) -> Color {
  match severity {
    Severity::Info => Color::Blue,
    Severity::Success => Color::Green,
    Severity::Warning => Color::Yellow,
    Severity::Danger => Color::Red,
  }
}

pub fn render(session: &Session, out: &mut impl Write) -> io::Result<()> {
  let config = session.config();
  writeln!(out, "input: {}", session.raw_input())?;

  match session.placeholder() {
    Some(placeholder) => writeln!(out, "{}", placeholder.dark_grey())?,
    None => {
      write!(
        out,
        "hashtags ({}/{}):",
        session.hashtags().len(),
        config.max_hashtags
      )?;
      for (index, tag) in session.hashtags().iter().enumerate() {
        let chip = format!("[{}] {tag}", index + 1).with(chip_color(config.chip_color(index)));
        if session.copied() == Some(index) {
          write!(out, " {} {}", chip, "copied".green())?;
        } else {
          write!(out, " {chip}")?;
        }
      }
      writeln!(out)?;
    },
  }

  match session.corpus() {
    CorpusState::Loading => writeln!(out, "{}", "suggestions loading".dark_grey())?,
    CorpusState::Unavailable => {},
    CorpusState::Ready(_) if session.suggestions().is_empty() => {},
    CorpusState::Ready(_) => {
      write!(out, "suggestions:")?;
      for (index, tag) in session.suggestions().iter().enumerate() {
        write!(out, " {}) {tag}", index + 1)?;
      }
      writeln!(out)?;
    },
  }

  if let Some(notification) = session.notification() {
    let label = format!("[{:?}]", notification.severity).to_lowercase();
    writeln!(
      out,
      "{} {}",
      label.with(severity_color(notification.severity)),
      notification.message
    )?;
  }

  out.flush()
}
