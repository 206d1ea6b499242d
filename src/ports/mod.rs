//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `FlowRunner` - Runs the hosted Langflow flow and returns its JSON body
//! - `TranscriptStore` - Append-only session transcript storage

mod flow_runner;
mod transcript_store;

pub use flow_runner::{FlowError, FlowRunRequest, FlowRunner, RunnerInfo};
pub use transcript_store::{TranscriptError, TranscriptStore};
