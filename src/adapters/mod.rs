//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `langflow` - Flow runners (Langflow HTTP client, mock)
//! - `transcript` - Transcript stores (in-memory)
//! - `http` - Axum REST surface

pub mod http;
pub mod langflow;
pub mod transcript;

pub use langflow::{LangflowClient, LangflowClientConfig, MockFlowRunner};
pub use transcript::InMemoryTranscriptStore;
