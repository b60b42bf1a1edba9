//! Keyed store of per-user sessions with per-user turn serialization.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use placebot_core::{FollowUpFilter, Query, VenueCategory};

use crate::state::SessionState;

/// Sessions keyed by opaque sender id, backed by an in-process map.
///
/// [`SessionStore::entry`] hands out the per-user lock. A turn holds it
/// across its suspending calls, so two rapid messages from the same user
/// cannot interleave their read-then-write sequences; unrelated users
/// never block on each other.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The session slot for a user, created with defaults on first touch.
    pub async fn entry(&self, user_id: &str) -> Arc<Mutex<SessionState>> {
        let mut sessions = self.sessions.lock().await;
        Arc::clone(sessions.entry(user_id.to_string()).or_insert_with(|| {
            debug!("Creating session for sender {user_id}");
            Arc::new(Mutex::new(SessionState::new()))
        }))
    }

    /// Snapshot of a user's current state, creating it if absent.
    pub async fn get(&self, user_id: &str) -> SessionState {
        let entry = self.entry(user_id).await;
        let state = entry.lock().await;
        state.clone()
    }

    /// Clear a user's conversation-scoped state, keeping the UI mode.
    pub async fn reset_conversation(&self, user_id: &str) {
        let entry = self.entry(user_id).await;
        entry.lock().await.reset_conversation();
    }

    pub async fn set_category(&self, user_id: &str, category: VenueCategory) {
        let entry = self.entry(user_id).await;
        entry.lock().await.set_category(category);
    }

    pub async fn save_query(&self, user_id: &str, query: Query) {
        let entry = self.entry(user_id).await;
        entry.lock().await.save_query(query);
    }

    /// Apply a follow-up filter to the user's saved query. `None` when
    /// there is no saved query; state is left unchanged in that case.
    pub async fn apply_filter(&self, user_id: &str, filter: FollowUpFilter) -> Option<Query> {
        let entry = self.entry(user_id).await;
        let mut state = entry.lock().await;
        state.apply_filter(filter)
    }
}
