//! System clipboard for runtime hosts.
//!
//! Copying is done by piping the payload into whichever clipboard tool the
//! environment provides (`pbcopy`, `wl-copy`, `xclip`, ...). Which one is
//! chosen by [`ClipboardProvider::detect`], or configured explicitly.

use std::borrow::Cow;

use serde::{
  Deserialize,
  Serialize,
};
use tagsmith_lib::clipboard::{
  ClipboardError,
  ClipboardProvider as ClipboardBackend,
  Result,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Command {
  command: Cow<'static, str>,
  #[serde(default)]
  args:    Cow<'static, [Cow<'static, str>]>,
}

impl Command {
  pub fn new(command: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
    Self {
      command: Cow::Owned(command.into()),
      args:    Cow::Owned(args.into_iter().map(Cow::Owned).collect()),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ClipboardProvider {
  Pasteboard,
  Wayland,
  XClip,
  XSel,
  Win32Yank,
  Tmux,
  #[cfg(windows)]
  Windows,
  Termux,
  Custom(Command),
  None,
}

impl ClipboardProvider {
  pub fn detect() -> Self {
    Self::default()
  }

  /// Label and copy command of the providers that shell out to a tool.
  fn builtin(&self) -> Option<(&'static str, &'static Command)> {
    match self {
      Self::Pasteboard => Some(("pasteboard", &PBCOPY)),
      Self::Wayland => Some(("wayland", &WL_COPY)),
      Self::XClip => Some(("x-clip", &XCLIP)),
      Self::XSel => Some(("x-sel", &XSEL)),
      Self::Win32Yank => Some(("win-32-yank", &WIN32YANK)),
      Self::Tmux => Some(("tmux", &TMUX)),
      Self::Termux => Some(("termux", &TERMUX)),
      _ => None,
    }
  }
}

fn env_var_is_set(name: &str) -> bool {
  std::env::var_os(name).is_some()
}

fn binary_exists(name: &str) -> bool {
  which::which(name).is_ok()
}

impl Default for ClipboardProvider {
  #[cfg(windows)]
  fn default() -> Self {
    if binary_exists("win32yank.exe") {
      Self::Win32Yank
    } else {
      Self::Windows
    }
  }

  #[cfg(target_os = "macos")]
  fn default() -> Self {
    if env_var_is_set("TMUX") && binary_exists("tmux") {
      Self::Tmux
    } else if binary_exists("pbcopy") {
      Self::Pasteboard
    } else {
      Self::None
    }
  }

  #[cfg(not(any(windows, target_os = "macos")))]
  fn default() -> Self {
    if env_var_is_set("WAYLAND_DISPLAY") && binary_exists("wl-copy") {
      Self::Wayland
    } else if env_var_is_set("DISPLAY") && binary_exists("xclip") {
      Self::XClip
    } else if env_var_is_set("DISPLAY") && binary_exists("xsel") {
      Self::XSel
    } else if binary_exists("termux-clipboard-set") {
      Self::Termux
    } else if env_var_is_set("TMUX") && binary_exists("tmux") {
      Self::Tmux
    } else if binary_exists("win32yank.exe") {
      Self::Win32Yank
    } else {
      Self::None
    }
  }
}

impl ClipboardBackend for ClipboardProvider {
  fn name(&self) -> Cow<'_, str> {
    if let Some((label, builtin)) = self.builtin() {
      return Cow::Owned(format!("{label} ({})", builtin.command));
    }

    match self {
      #[cfg(windows)]
      Self::Windows => "windows".into(),
      Self::Custom(command) => Cow::Owned(format!("custom ({})", command.command)),
      _ => "none".into(),
    }
  }

  fn set_contents(&self, content: &str) -> Result<()> {
    if let Some((_, builtin)) = self.builtin() {
      return execute_command(builtin, content);
    }

    match self {
      #[cfg(windows)]
      Self::Windows => clipboard_win::set_clipboard(clipboard_win::formats::Unicode, content)
        .map_err(|err| ClipboardError::Platform(err.to_string())),
      Self::Custom(command) => execute_command(command, content),
      _ => Err(ClipboardError::Unavailable),
    }
  }
}

macro_rules! copy_command {
  ($name:ident, $cmd:literal $( , $arg:literal )* ) => {
    static $name: Command = Command {
      command: Cow::Borrowed($cmd),
      args: Cow::Borrowed(&[ $( Cow::Borrowed($arg) ),* ]),
    };
  };
}

copy_command!(TMUX, "tmux", "load-buffer", "-w", "-");
copy_command!(PBCOPY, "pbcopy");
copy_command!(WL_COPY, "wl-copy", "--type", "text/plain");
copy_command!(XCLIP, "xclip", "-i", "-selection", "clipboard");
copy_command!(XSEL, "xsel", "-i", "-b");
copy_command!(WIN32YANK, "win32yank.exe", "-i", "--crlf");
copy_command!(TERMUX, "termux-clipboard-set");

fn execute_command(cmd: &Command, input: &str) -> Result<()> {
  use std::{
    io::Write,
    process::{
      Command as ProcessCommand,
      Stdio,
    },
  };

  let mut command = ProcessCommand::new(cmd.command.as_ref());
  let mut command = command
    .args(cmd.args.iter().map(AsRef::as_ref))
    .stdin(Stdio::piped())
    .stdout(Stdio::null())
    .stderr(Stdio::null());

  // Detach from our session so tools that keep serving the selection
  // (xclip, wl-copy) outlive the terminal.
  #[cfg(unix)]
  {
    use std::os::unix::process::CommandExt;

    unsafe {
      command = command.pre_exec(|| match libc::setsid() {
        -1 => Err(std::io::Error::last_os_error()),
        _ => Ok(()),
      });
    }
  }

  let mut child = command.spawn()?;
  {
    let mut stdin = child.stdin.take().ok_or(ClipboardError::StdinWriteFailed)?;
    stdin
      .write_all(input.as_bytes())
      .map_err(|_| ClipboardError::StdinWriteFailed)?;
  }

  let status = child.wait()?;
  if !status.success() {
    return Err(ClipboardError::CommandFailed);
  }
  Ok(())
}
