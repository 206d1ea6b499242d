//! Transcript Store Adapters.

mod in_memory;

pub use in_memory::{InMemoryTranscriptStore, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_SESSIONS};
