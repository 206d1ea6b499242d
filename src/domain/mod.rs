//! Domain layer - pure types and logic with no I/O.
//!
//! - `extraction` - tolerant answer extraction from upstream responses
//! - `input` - typed and uploaded user input
//! - `transcript` - session transcript entries
//! - `foundation` - shared identifiers, timestamps, and validation errors

pub mod extraction;
pub mod foundation;
pub mod input;
pub mod transcript;
