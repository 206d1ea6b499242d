//! Mock Flow Runner for testing and local development.
//!
//! Returns pre-configured JSON envelopes or errors without calling the
//! upstream service.
//!
//! # Example
//!
//! ```ignore
//! let runner = MockFlowRunner::new()
//!     .with_answer("Hello, I'm the flow!")
//!     .with_error(FlowError::AuthenticationFailed);
//!
//! let body = runner.run(FlowRunRequest::chat("hi")).await?;
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{FlowError, FlowRunRequest, FlowRunner, RunnerInfo};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this JSON body.
    Body(Value),
    /// Return an error.
    Error(FlowError),
}

/// Most recent calls kept for inspection; older ones are dropped.
pub const MAX_RECORDED_CALLS: usize = 32;

#[derive(Debug, Default)]
struct CallLog {
    recent: VecDeque<FlowRunRequest>,
    total: usize,
}

/// Mock flow runner.
///
/// Outcomes are consumed in order; once the queue is empty every call gets a
/// Langflow-shaped envelope that echoes the input. Only the last
/// [`MAX_RECORDED_CALLS`] requests are retained.
#[derive(Debug, Clone, Default)]
pub struct MockFlowRunner {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    delay: Duration,
    calls: Arc<Mutex<CallLog>>,
}

impl MockFlowRunner {
    /// Creates a new mock runner with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a Langflow run envelope carrying `text` as the chat answer.
    pub fn envelope(text: impl Into<String>) -> Value {
        json!({
            "session_id": "mock-session",
            "outputs": [{
                "inputs": {},
                "outputs": [{
                    "results": {"message": {"text": text.into(), "sender": "Machine"}}
                }]
            }]
        })
    }

    /// Queues a Langflow envelope carrying `text`.
    pub fn with_answer(self, text: impl Into<String>) -> Self {
        self.with_body(Self::envelope(text))
    }

    /// Queues an arbitrary JSON body.
    pub fn with_body(self, body: Value) -> Self {
        self.push(MockOutcome::Body(body));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: FlowError) -> Self {
        self.push(MockOutcome::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this runner.
    pub fn call_count(&self) -> usize {
        self.lock_calls().total
    }

    /// Returns the retained calls, oldest first.
    pub fn get_calls(&self) -> Vec<FlowRunRequest> {
        self.lock_calls().recent.iter().cloned().collect()
    }

    fn push(&self, outcome: MockOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, CallLog> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, request: FlowRunRequest) {
        let mut log = self.lock_calls();
        if log.recent.len() >= MAX_RECORDED_CALLS {
            log.recent.pop_front();
        }
        log.recent.push_back(request);
        log.total += 1;
    }

    fn next_outcome(&self, request: &FlowRunRequest) -> MockOutcome {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                MockOutcome::Body(Self::envelope(format!(
                    "Mock analysis of: {}",
                    request.input_value
                )))
            })
    }
}

#[async_trait]
impl FlowRunner for MockFlowRunner {
    async fn run(&self, request: FlowRunRequest) -> Result<Value, FlowError> {
        let outcome = self.next_outcome(&request);
        self.record(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match outcome {
            MockOutcome::Body(body) => Ok(body),
            MockOutcome::Error(err) => Err(err),
        }
    }

    fn runner_info(&self) -> RunnerInfo {
        RunnerInfo::new("mock", "memory://mock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::ResponseExtractor;

    #[tokio::test]
    async fn returns_queued_outcomes_in_order() {
        let runner = MockFlowRunner::new()
            .with_answer("first")
            .with_error(FlowError::AuthenticationFailed)
            .with_body(json!({"output": "third"}));

        let first = runner.run(FlowRunRequest::chat("a")).await.unwrap();
        let second = runner.run(FlowRunRequest::chat("b")).await;
        let third = runner.run(FlowRunRequest::chat("c")).await.unwrap();

        let extractor = ResponseExtractor::default();
        assert_eq!(extractor.extract(&first).answer(), Some("first"));
        assert_eq!(second, Err(FlowError::AuthenticationFailed));
        assert_eq!(third, json!({"output": "third"}));
    }

    #[tokio::test]
    async fn empty_queue_echoes_input() {
        let runner = MockFlowRunner::new();
        let body = runner.run(FlowRunRequest::chat("ping")).await.unwrap();
        assert_eq!(
            ResponseExtractor::default().extract(&body).answer(),
            Some("Mock analysis of: ping")
        );
    }

    #[tokio::test]
    async fn records_calls() {
        let runner = MockFlowRunner::new();
        runner.run(FlowRunRequest::chat("one")).await.unwrap();
        runner.run(FlowRunRequest::chat("two")).await.unwrap();

        assert_eq!(runner.call_count(), 2);
        assert_eq!(runner.get_calls()[1].input_value, "two");
    }

    #[tokio::test]
    async fn call_history_keeps_only_recent_requests() {
        let runner = MockFlowRunner::new();
        let total = MAX_RECORDED_CALLS + 8;
        for i in 0..total {
            runner.run(FlowRunRequest::chat(i.to_string())).await.unwrap();
        }

        let calls = runner.get_calls();
        assert_eq!(runner.call_count(), total);
        assert_eq!(calls.len(), MAX_RECORDED_CALLS);
        assert_eq!(calls[0].input_value, "8");
        assert_eq!(calls[MAX_RECORDED_CALLS - 1].input_value, (total - 1).to_string());
    }

    #[tokio::test]
    async fn clones_share_queue_and_history() {
        let runner = MockFlowRunner::new().with_answer("shared");
        let clone = runner.clone();

        let body = clone.run(FlowRunRequest::chat("x")).await.unwrap();

        assert_eq!(
            ResponseExtractor::default().extract(&body).answer(),
            Some("shared")
        );
        assert_eq!(runner.call_count(), 1);
    }
}
