//! Transcript query and command handlers.

use std::sync::Arc;

use crate::domain::foundation::SessionKey;
use crate::domain::transcript::TranscriptEntry;
use crate::ports::{TranscriptError, TranscriptStore};

/// Query for a session's transcript.
#[derive(Debug, Clone)]
pub struct GetTranscriptQuery {
    pub session: SessionKey,
}

/// Handler for GetTranscriptQuery.
pub struct GetTranscriptHandler {
    transcript: Arc<dyn TranscriptStore>,
}

impl GetTranscriptHandler {
    pub fn new(transcript: Arc<dyn TranscriptStore>) -> Self {
        Self { transcript }
    }

    /// Returns the session's entries, oldest first.
    pub async fn handle(
        &self,
        query: GetTranscriptQuery,
    ) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        self.transcript.list(&query.session).await
    }
}

/// Command to clear a session's transcript.
#[derive(Debug, Clone)]
pub struct ClearTranscriptCommand {
    pub session: SessionKey,
}

/// Handler for ClearTranscriptCommand.
pub struct ClearTranscriptHandler {
    transcript: Arc<dyn TranscriptStore>,
}

impl ClearTranscriptHandler {
    pub fn new(transcript: Arc<dyn TranscriptStore>) -> Self {
        Self { transcript }
    }

    /// Clears the transcript and returns how many entries were removed.
    pub async fn handle(&self, cmd: ClearTranscriptCommand) -> Result<usize, TranscriptError> {
        let removed = self.transcript.clear(&cmd.session).await?;
        tracing::debug!(session = %cmd.session, removed, "Transcript cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::transcript::InMemoryTranscriptStore;
    use crate::domain::input::InputSource;
    use crate::domain::transcript::EntryOutcome;

    #[tokio::test]
    async fn get_and_clear_round_trip_through_store() {
        let store: Arc<dyn TranscriptStore> = Arc::new(InMemoryTranscriptStore::new());
        let session = SessionKey::new("tab-1").unwrap();
        store
            .append(
                &session,
                TranscriptEntry::new("q", InputSource::Text, EntryOutcome::NotFound),
            )
            .await
            .unwrap();

        let get = GetTranscriptHandler::new(Arc::clone(&store));
        let clear = ClearTranscriptHandler::new(Arc::clone(&store));

        let entries = get
            .handle(GetTranscriptQuery {
                session: session.clone(),
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);

        let removed = clear
            .handle(ClearTranscriptCommand {
                session: session.clone(),
            })
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let entries = get.handle(GetTranscriptQuery { session }).await.unwrap();
        assert!(entries.is_empty());
    }
}
