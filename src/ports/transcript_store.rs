//! Transcript Store Port - Append-only storage of session transcripts.

use async_trait::async_trait;

use crate::domain::foundation::SessionKey;
use crate::domain::transcript::TranscriptEntry;

/// Port for session transcript persistence.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Appends an entry to the session's transcript.
    async fn append(&self, session: &SessionKey, entry: TranscriptEntry)
        -> Result<(), TranscriptError>;

    /// Lists the session's entries, oldest first.
    async fn list(&self, session: &SessionKey) -> Result<Vec<TranscriptEntry>, TranscriptError>;

    /// Removes every entry of the session. Returns how many were removed.
    async fn clear(&self, session: &SessionKey) -> Result<usize, TranscriptError>;
}

/// Transcript storage errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("transcript storage unavailable: {0}")]
    Unavailable(String),
}
