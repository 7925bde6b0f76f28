//! Per-user conversational session storage.
//!
//! One session per user, holding the active wizard step and the draft
//! record under construction. Sessions are discarded on completion or
//! cancellation, and idle sessions are evicted lazily: every store access
//! first sweeps entries whose last-touched timestamp is older than the
//! configured TTL, so an abandoned wizard quietly expires instead of
//! pinning memory forever.

use crate::core::wizard::{DraftRecord, WizardStep};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Session {
    step: WizardStep,
    draft: DraftRecord,
    touched: Instant,
}

/// Keyed map of active wizard sessions.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Creates a store evicting sessions idle longer than `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a fresh wizard session for a user, replacing any session
    /// already in progress.
    pub async fn begin(&self, user: &str) {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);
        sessions.insert(
            user.to_string(),
            Session {
                step: WizardStep::SelectType,
                draft: DraftRecord::default(),
                touched: Instant::now(),
            },
        );
    }

    /// The current step and draft for a user's active session, if any.
    pub async fn snapshot(&self, user: &str) -> Option<(WizardStep, DraftRecord)> {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);
        sessions
            .get(user)
            .map(|session| (session.step, session.draft.clone()))
    }

    /// Stores the advanced step and draft, refreshing the idle timer.
    pub async fn store(&self, user: &str, step: WizardStep, draft: DraftRecord) {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);
        sessions.insert(
            user.to_string(),
            Session {
                step,
                draft,
                touched: Instant::now(),
            },
        );
    }

    /// Discards a user's session. Returns whether one was active.
    pub async fn clear(&self, user: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);
        sessions.remove(user).is_some()
    }

    /// Number of live sessions across all users.
    pub async fn active_count(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.ttl);
        sessions.len()
    }

    fn sweep(sessions: &mut HashMap<String, Session>, ttl: Duration) {
        sessions.retain(|_, session| session.touched.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::TransactionType;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn begin_starts_at_select_type_with_empty_draft() {
        let store = SessionStore::new(TTL);
        store.begin("user1").await;

        let (step, draft) = store.snapshot("user1").await.expect("session active");
        assert_eq!(step, WizardStep::SelectType);
        assert_eq!(draft, DraftRecord::default());
    }

    #[tokio::test]
    async fn sessions_are_isolated_per_user() {
        let store = SessionStore::new(TTL);
        store.begin("user1").await;

        assert!(store.snapshot("user1").await.is_some());
        assert!(store.snapshot("user2").await.is_none());
    }

    #[tokio::test]
    async fn begin_replaces_a_session_in_progress() {
        let store = SessionStore::new(TTL);
        store.begin("user1").await;

        let mut draft = DraftRecord::default();
        draft.kind = Some(TransactionType::Savings);
        store.store("user1", WizardStep::SelectCategory, draft).await;

        store.begin("user1").await;
        let (step, draft) = store.snapshot("user1").await.expect("session active");
        assert_eq!(step, WizardStep::SelectType);
        assert_eq!(draft, DraftRecord::default());
    }

    #[tokio::test]
    async fn clear_reports_whether_a_session_was_active() {
        let store = SessionStore::new(TTL);
        assert!(!store.clear("user1").await);

        store.begin("user1").await;
        assert!(store.clear("user1").await);
        assert!(store.snapshot("user1").await.is_none());
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        store.begin("user1").await;
        assert!(store.snapshot("user1").await.is_none());
        assert_eq!(store.active_count().await, 0);
    }
}
