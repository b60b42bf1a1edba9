//! Combining category, resolved location, and session-saved filters into
//! one provider query.

use tracing::debug;

use placebot_core::{FollowUpFilter, Location, Query, VenueCategory};
use placebot_session::SessionState;

/// Build a provider query from what this turn supplied plus what the
/// session remembered.
///
/// Category resolution: explicit parameter, else the session's pending
/// category, else top picks. A missing location aborts the build;
/// insufficient information is a normal, expected outcome, not an error.
/// On success the query becomes the session's `last_query` and the
/// pending category is cleared: it has now been consumed.
pub fn build(
    session: &mut SessionState,
    category: Option<VenueCategory>,
    location: Option<Location>,
) -> Option<Query> {
    let category = category
        .or(session.pending_category)
        .unwrap_or(VenueCategory::TopPicks);
    let Some(location) = location else {
        debug!("No resolvable location for a {category} search; query aborted");
        return None;
    };
    let query = Query::new(category, location);
    session.save_query(query.clone());
    session.pending_category = None;
    Some(query)
}

/// Apply a follow-up filter to the session's saved query, returning the
/// refined query to re-issue, or `None` when there is nothing to refine.
pub fn apply_follow_up(session: &mut SessionState, filter: FollowUpFilter) -> Option<Query> {
    session.apply_filter(filter)
}
