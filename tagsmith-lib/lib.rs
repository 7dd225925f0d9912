//! Core of tagsmith: turns free text into hashtags and keeps the state of a
//! single editing session.
//!
//! Nothing in this crate performs IO. Hosts (see `tagsmith-runtime` and the
//! `tagsmith` binary) provide clipboard and storage implementations, fetch the
//! suggestion corpus and drive the session clock.

pub mod clipboard;
pub mod config;
pub mod format;
pub mod fuzzy;
pub mod messages;
pub mod sanitize;
pub mod session;
pub mod storage;
pub mod suggest;
pub mod timer;

pub use config::Config;
pub use format::{
  Formatted,
  format,
};
pub use session::Session;
pub use suggest::Corpus;
