//! Flow Runner Adapters.
//!
//! - `LangflowClient` - reqwest client for the hosted Langflow run API
//! - `MockFlowRunner` - Configurable mock for tests and local development

mod client;
mod mock_runner;

pub use client::{LangflowClient, LangflowClientConfig};
pub use mock_runner::{MockFlowRunner, MockOutcome};
