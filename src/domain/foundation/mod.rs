//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, and validation errors used across the
//! extraction, input, and transcript modules.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{EntryId, SessionKey, MAX_SESSION_KEY_LENGTH};
pub use timestamp::Timestamp;
