//! Lines typed into the interactive session.
//!
//! Plain text is typed into the input; lines starting with `:` are commands.
//! Indices are 1-based, as shown on screen.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
  Type(String),
  Set(String),
  Clear,
  Delete(usize),
  Accept(usize),
  CopyAll,
  CopyOne(usize),
  Dismiss,
  Show,
  Help,
  Quit,
}

pub const HELP: &str = "\
text        type text into the input
:set TEXT   replace the input
:clear      clear the input
:del N      delete hashtag N
:accept N   replace the word being typed with suggestion N
:copy [N]   copy all hashtags, or hashtag N
:dismiss    dismiss the notification
:show       print the current state
:help       this help
:quit       leave";

pub fn parse(line: &str) -> Result<Input, String> {
  let Some(command) = line.strip_prefix(':') else {
    return Ok(Input::Type(line.to_string()));
  };

  let (name, arg) = match command.split_once(char::is_whitespace) {
    Some((name, arg)) => (name, arg.trim()),
    None => (command.trim(), ""),
  };

  let index = |arg: &str| -> Result<usize, String> {
    match arg.parse::<usize>() {
      Ok(n) if n > 0 => Ok(n - 1),
      _ => Err(format!("expected a position starting at 1, got {arg:?}")),
    }
  };

  match name {
    "set" => Ok(Input::Set(arg.to_string())),
    "clear" => Ok(Input::Clear),
    "del" | "delete" => index(arg).map(Input::Delete),
    "accept" => index(arg).map(Input::Accept),
    "copy" if arg.is_empty() => Ok(Input::CopyAll),
    "copy" => index(arg).map(Input::CopyOne),
    "dismiss" => Ok(Input::Dismiss),
    "show" => Ok(Input::Show),
    "help" | "h" => Ok(Input::Help),
    "quit" | "q" => Ok(Input::Quit),
    _ => Err(format!("unknown command :{name} (try :help)")),
  }
}

/// Appends typed text to the input, separated from the previous word.
pub fn append(input: &str, typed: &str) -> String {
  if input.is_empty() || input.ends_with(tagsmith_lib::format::is_separator) {
    return format!("{input}{typed}");
  }
  format!("{input} {typed}")
}
