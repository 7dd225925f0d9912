//! Side-effectful pieces of tagsmith: the system clipboard, on-disk session
//! state and fetching the suggestion corpus. Hosts wire these into a
//! [`tagsmith_lib::Session`].

pub mod clipboard;
pub mod corpus;
pub mod storage;
