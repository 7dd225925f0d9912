use std::collections::VecDeque;

use serde::{
  Deserialize,
  Serialize,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Info,
  Success,
  Warning,
  Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub id:       u64,
  pub severity: Severity,
  pub message:  String,
}

/// Holds at most one live notification. Showing a new one replaces the
/// current one; the host schedules expiry.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
  active:        Option<Notification>,
  history:       VecDeque<Notification>,
  next_id:       u64,
  history_limit: usize,
}

impl Default for NotificationCenter {
  fn default() -> Self {
    Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
  }
}

impl NotificationCenter {
  pub fn with_history_limit(history_limit: usize) -> Self {
    Self {
      active:        None,
      history:       VecDeque::new(),
      next_id:       1,
      history_limit: history_limit.max(1),
    }
  }

  pub fn active(&self) -> Option<&Notification> {
    self.active.as_ref()
  }

  pub fn is_idle(&self) -> bool {
    self.active.is_none()
  }

  pub fn history(&self) -> impl Iterator<Item = &Notification> {
    self.history.iter()
  }

  pub fn show(&mut self, severity: Severity, message: impl Into<String>) -> Notification {
    let notification = Notification {
      id: self.next_id,
      severity,
      message: message.into(),
    };
    self.next_id = self.next_id.saturating_add(1);

    if let Some(replaced) = self.active.replace(notification.clone()) {
      log::debug!("notification {} preempted by {}", replaced.id, notification.id);
    }

    self.history.push_back(notification.clone());
    while self.history.len() > self.history_limit {
      self.history.pop_front();
    }
    notification
  }

  pub fn dismiss(&mut self) -> Option<Notification> {
    self.active.take()
  }
}
