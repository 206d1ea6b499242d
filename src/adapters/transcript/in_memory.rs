//! In-memory transcript store.
//!
//! Keeps each session's transcript in process memory. Transcripts are lost on
//! restart, which matches the lifetime of a browser session.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionKey;
use crate::domain::transcript::TranscriptEntry;
use crate::ports::{TranscriptError, TranscriptStore};

/// Default per-session entry cap.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default cap on the number of sessions held at once.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

/// One session's entries plus when it was last written.
#[derive(Debug, Default)]
struct SessionTranscript {
    entries: Vec<TranscriptEntry>,
    last_append: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    by_key: HashMap<SessionKey, SessionTranscript>,
    /// Monotonic append counter used to order sessions by recency.
    appends: u64,
}

impl Sessions {
    /// Drops the session written to least recently.
    fn evict_stalest(&mut self) -> Option<SessionKey> {
        let stalest = self
            .by_key
            .iter()
            .min_by_key(|(_, transcript)| transcript.last_append)
            .map(|(key, _)| key.clone())?;
        self.by_key.remove(&stalest);
        Some(stalest)
    }
}

/// In-memory transcript store with per-session and session-count caps.
///
/// When a session reaches its entry cap the oldest entry is dropped on
/// append. When a new session arrives and the store already holds
/// `max_sessions`, the session with the oldest last append is evicted.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryTranscriptStore::new()
///     .with_max_entries(20)
///     .with_max_sessions(500);
/// store.append(&session, entry).await?;
/// assert_eq!(store.list(&session).await?.len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryTranscriptStore {
    sessions: RwLock<Sessions>,
    max_entries: usize,
    max_sessions: usize,
}

impl InMemoryTranscriptStore {
    /// Creates an empty store with [`DEFAULT_MAX_ENTRIES`] and
    /// [`DEFAULT_MAX_SESSIONS`].
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_entries: DEFAULT_MAX_ENTRIES,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Sets the per-session cap. A cap of zero is treated as one.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Sets the session-count cap. A cap of zero is treated as one.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Returns the number of sessions with at least one entry.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.by_key.len()
    }
}

impl Default for InMemoryTranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn append(
        &self,
        session: &SessionKey,
        entry: TranscriptEntry,
    ) -> Result<(), TranscriptError> {
        let mut sessions = self.sessions.write().await;

        if !sessions.by_key.contains_key(session) {
            while sessions.by_key.len() >= self.max_sessions {
                let Some(evicted) = sessions.evict_stalest() else {
                    break;
                };
                tracing::debug!(session = %evicted, "Session cap reached, evicted transcript");
            }
        }

        sessions.appends += 1;
        let stamp = sessions.appends;
        let transcript = sessions.by_key.entry(session.clone()).or_default();
        transcript.last_append = stamp;

        let entries = &mut transcript.entries;
        if entries.len() >= self.max_entries {
            let overflow = entries.len() + 1 - self.max_entries;
            entries.drain(..overflow);
            tracing::debug!(session = %session, dropped = overflow, "Transcript cap reached");
        }
        entries.push(entry);
        Ok(())
    }

    async fn list(&self, session: &SessionKey) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        Ok(self
            .sessions
            .read()
            .await
            .by_key
            .get(session)
            .map(|transcript| transcript.entries.clone())
            .unwrap_or_default())
    }

    async fn clear(&self, session: &SessionKey) -> Result<usize, TranscriptError> {
        Ok(self
            .sessions
            .write()
            .await
            .by_key
            .remove(session)
            .map(|transcript| transcript.entries.len())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::InputSource;
    use crate::domain::transcript::EntryOutcome;
    use std::sync::Arc;

    fn entry(input: &str) -> TranscriptEntry {
        TranscriptEntry::new(
            input,
            InputSource::Text,
            EntryOutcome::Answered {
                text: format!("answer to {}", input),
            },
        )
    }

    fn session(key: &str) -> SessionKey {
        SessionKey::new(key).unwrap()
    }

    #[tokio::test]
    async fn list_returns_entries_oldest_first() {
        let store = InMemoryTranscriptStore::new();
        let s = session("a");
        store.append(&s, entry("one")).await.unwrap();
        store.append(&s, entry("two")).await.unwrap();

        let entries = store.list(&s).await.unwrap();
        let inputs: Vec<_> = entries.iter().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn unknown_session_lists_empty() {
        let store = InMemoryTranscriptStore::new();
        assert!(store.list(&session("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemoryTranscriptStore::new();
        store.append(&session("a"), entry("for a")).await.unwrap();
        store.append(&session("b"), entry("for b")).await.unwrap();

        let a = store.list(&session("a")).await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].input, "for a");
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn cap_drops_oldest_entries() {
        let store = InMemoryTranscriptStore::new().with_max_entries(2);
        let s = session("a");
        for input in ["one", "two", "three"] {
            store.append(&s, entry(input)).await.unwrap();
        }

        let inputs: Vec<_> = store
            .list(&s)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.input)
            .collect();
        assert_eq!(inputs, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn clear_removes_session_entries() {
        let store = InMemoryTranscriptStore::new();
        let s = session("a");
        store.append(&s, entry("one")).await.unwrap();
        store.append(&s, entry("two")).await.unwrap();

        assert_eq!(store.clear(&s).await.unwrap(), 2);
        assert!(store.list(&s).await.unwrap().is_empty());
        assert_eq!(store.clear(&s).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn session_count_stays_within_cap() {
        let store = InMemoryTranscriptStore::new()
            .with_max_entries(1)
            .with_max_sessions(50);

        for i in 0..2_000 {
            store
                .append(&session(&format!("visitor-{}", i)), entry("hi"))
                .await
                .unwrap();
        }

        assert_eq!(store.session_count().await, 50);
        assert!(store.list(&session("visitor-0")).await.unwrap().is_empty());
        assert_eq!(store.list(&session("visitor-1999")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn eviction_spares_recently_written_sessions() {
        let store = InMemoryTranscriptStore::new().with_max_sessions(2);
        store.append(&session("old"), entry("one")).await.unwrap();
        store.append(&session("active"), entry("two")).await.unwrap();
        store.append(&session("old"), entry("three")).await.unwrap();

        store.append(&session("new"), entry("four")).await.unwrap();

        assert_eq!(store.session_count().await, 2);
        assert_eq!(store.list(&session("old")).await.unwrap().len(), 2);
        assert!(store.list(&session("active")).await.unwrap().is_empty());
        assert_eq!(store.list(&session("new")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn existing_session_at_cap_is_not_evicted() {
        let store = InMemoryTranscriptStore::new().with_max_sessions(1);
        let s = session("only");
        store.append(&s, entry("one")).await.unwrap();
        store.append(&s, entry("two")).await.unwrap();

        assert_eq!(store.session_count().await, 1);
        assert_eq!(store.list(&s).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let store = Arc::new(InMemoryTranscriptStore::new());
        let s = session("busy");

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                let s = s.clone();
                tokio::spawn(async move { store.append(&s, entry(&i.to_string())).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.list(&s).await.unwrap().len(), 20);
    }
}
