//! Langflow Relay - tolerant answer extraction for hosted Langflow flows
//!
//! Relays user text or uploaded text files to a Langflow run endpoint and
//! pulls a display answer out of whatever JSON envelope comes back, falling
//! back to the first meaningful line when no known location matches.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
