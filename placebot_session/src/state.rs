//! Per-user conversation state and its mutation operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use placebot_core::{FollowUpFilter, Query, VenueCategory};

/// Where the conversation with one user currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogState {
    #[default]
    Idle,
    AwaitingCategory,
    AwaitingLocation,
    ResultsDelivered,
}

/// Conversation state for one opaque sender id.
///
/// Created lazily on first touch and never explicitly destroyed;
/// everything here is re-derivable from the next user message except the
/// pending category and filter flags, whose loss across restarts is a
/// deliberate trade-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Guided (button-driven) UI vs. free-text UI.
    pub quick_replies_enabled: bool,
    pub state: DialogState,
    /// Category remembered across a location-prompt round.
    pub pending_category: Option<VenueCategory>,
    /// The most recently built query, retained so follow-up filters can
    /// be applied without re-resolving location and category.
    pub last_query: Option<Query>,
    pub open_only: Option<bool>,
    pub sort_by_distance: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            quick_replies_enabled: true,
            state: DialogState::Idle,
            pending_category: None,
            last_query: None,
            open_only: None,
            sort_by_distance: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Clear everything conversation-scoped. The UI mode survives.
    pub fn reset_conversation(&mut self) {
        self.state = DialogState::Idle;
        self.pending_category = None;
        self.last_query = None;
        self.open_only = None;
        self.sort_by_distance = None;
        self.touch();
    }

    pub fn set_state(&mut self, state: DialogState) {
        self.state = state;
        self.touch();
    }

    pub fn set_category(&mut self, category: VenueCategory) {
        self.pending_category = Some(category);
        self.touch();
    }

    /// Remember the most recently built query. A new query starts a new
    /// filter lifecycle.
    pub fn save_query(&mut self, query: Query) {
        self.last_query = Some(query);
        self.open_only = None;
        self.sort_by_distance = None;
        self.touch();
    }

    pub fn clear_last_query(&mut self) {
        self.last_query = None;
        self.open_only = None;
        self.sort_by_distance = None;
        self.touch();
    }

    /// Mutate the saved query in place and mark the filter consumed.
    ///
    /// Fails silently, leaving state unchanged, when there is no saved
    /// query to refine.
    pub fn apply_filter(&mut self, filter: FollowUpFilter) -> Option<Query> {
        let query = self.last_query.as_mut()?;
        filter.apply(query);
        let applied = query.clone();
        match filter {
            FollowUpFilter::OpenOnly => self.open_only = Some(true),
            FollowUpFilter::SortByDistance => self.sort_by_distance = Some(true),
        }
        self.touch();
        Some(applied)
    }

    /// Filters not yet consumed in the current query lifecycle. Only
    /// these may be offered as quick replies.
    #[must_use]
    pub fn unused_filters(&self) -> Vec<FollowUpFilter> {
        FollowUpFilter::ALL
            .into_iter()
            .filter(|filter| !self.filter_applied(*filter))
            .collect()
    }

    #[must_use]
    pub const fn filter_applied(&self, filter: FollowUpFilter) -> bool {
        match filter {
            FollowUpFilter::OpenOnly => matches!(self.open_only, Some(true)),
            FollowUpFilter::SortByDistance => matches!(self.sort_by_distance, Some(true)),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
