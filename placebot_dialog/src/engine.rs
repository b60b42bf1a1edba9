//! The dialog state machine.
//!
//! Given one classified event and the session store, decides what to do
//! next: ask for a category, ask for a location, issue a query, offer
//! follow-up filters, answer help, or reset. Every turn ends with a next
//! prompt for the user; a conversation is never left stuck.

use std::sync::Arc;

use tracing::{debug, error, info};

use placebot_core::{
    ActionKind, ClassifiedEvent, FollowUpFilter, Location, OutboundMessage, PlacesProvider, Query,
    QuickReply, VenueCard, VenueCategory, chunk, location,
};
use placebot_session::{DialogState, SessionState, SessionStore};

use crate::{format, query};

/// Multi-turn dialog engine, shared across all users.
pub struct DialogEngine {
    store: Arc<SessionStore>,
    places: Arc<dyn PlacesProvider>,
}

impl DialogEngine {
    #[must_use]
    pub fn new(store: Arc<SessionStore>, places: Arc<dyn PlacesProvider>) -> Self {
        Self { store, places }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Process one classified event for a sender and return the outbound
    /// messages to dispatch, in order.
    ///
    /// The sender's session lock is held for the whole turn, so rapid
    /// messages from one user are serialized while other users proceed.
    pub async fn handle_event(
        &self,
        sender_id: &str,
        event: ClassifiedEvent,
    ) -> Vec<OutboundMessage> {
        let entry = self.store.entry(sender_id).await;
        let mut session = entry.lock().await;

        match event {
            ClassifiedEvent::Speech(text) => chunk::split(&text)
                .into_iter()
                .map(OutboundMessage::text)
                .collect(),
            ClassifiedEvent::Payloads(payloads) => payloads
                .into_iter()
                .map(OutboundMessage::Platform)
                .collect(),
            ClassifiedEvent::Action {
                action,
                intent,
                parameters,
            } => match action {
                ActionKind::FindVenue => {
                    debug!("Venue search requested (intent {intent})");
                    let category = parameters.venue.as_deref().and_then(VenueCategory::parse);
                    let resolved = location::resolve(&parameters);
                    self.find_venue(&mut session, category, resolved).await
                }
                ActionKind::Help => Self::help(&session),
                ActionKind::StartOver => Self::start_over(&mut session),
                ActionKind::Other(name) => {
                    debug!("No handler for action {name} (intent {intent}); staying quiet");
                    Vec::new()
                }
            },
            ClassifiedEvent::Postback(payload) => self.postback(&mut session, &payload).await,
            ClassifiedEvent::SharedLocation { lat, long } => {
                let resolved =
                    location::in_range(lat, long).then_some(Location::Coordinates { lat, long });
                self.find_venue(&mut session, None, resolved).await
            }
        }
    }

    /// A quick-reply or postback payload: follow-up filter, category
    /// pick, or an explicit no-op.
    async fn postback(&self, session: &mut SessionState, payload: &str) -> Vec<OutboundMessage> {
        if let Some(filter) = FollowUpFilter::parse(payload) {
            return self.follow_up(session, filter).await;
        }
        if let Some(category) = VenueCategory::parse(payload) {
            return self.find_venue(session, Some(category), None).await;
        }
        info!("Ignoring unrecognized postback payload: {payload}");
        Vec::new()
    }

    /// One full category/location round: build, query, render.
    async fn find_venue(
        &self,
        session: &mut SessionState,
        category: Option<VenueCategory>,
        resolved: Option<Location>,
    ) -> Vec<OutboundMessage> {
        let Some(built) = query::build(session, category, resolved) else {
            // Insufficient information: a new round began, so the stale
            // query is gone, but the requested category survives the
            // location prompt.
            session.clear_last_query();
            if let Some(category) = category {
                session.set_category(category);
            }
            session.set_state(DialogState::AwaitingLocation);
            return vec![OutboundMessage::text(location_prompt(
                session.pending_category,
            ))];
        };

        match self.places.explore(&built).await {
            Ok(response) => {
                if let Some(detail) = response.geocode_failure() {
                    info!("Provider could not geocode the requested location");
                    return Self::geocode_reprompt(session, &built, detail);
                }
                match format::format(&response, built.limit) {
                    Some(cards) if !cards.is_empty() => Self::deliver(session, cards),
                    _ => Self::no_results(session, &built),
                }
            }
            Err(cause) => {
                error!("Provider call failed: {cause}");
                vec![OutboundMessage::text(
                    "Something went wrong on my end. Please try again.",
                )]
            }
        }
    }

    /// Re-issue the saved query with one more filter applied.
    async fn follow_up(
        &self,
        session: &mut SessionState,
        filter: FollowUpFilter,
    ) -> Vec<OutboundMessage> {
        if session.filter_applied(filter) {
            debug!("Filter {filter:?} already consumed for this query; ignoring");
            return Vec::new();
        }
        let Some(refined) = query::apply_follow_up(session, filter) else {
            debug!("Follow-up filter with no saved query; ignoring");
            return Vec::new();
        };

        match self.places.explore(&refined).await {
            Ok(response) => match format::format(&response, refined.limit) {
                Some(cards) if !cards.is_empty() => Self::deliver(session, cards),
                _ => Self::no_results(session, &refined),
            },
            Err(cause) => {
                error!("Provider call failed: {cause}");
                vec![OutboundMessage::text(
                    "Something went wrong on my end. Please try again.",
                )]
            }
        }
    }

    /// Send the cards and offer the filters not yet consumed.
    fn deliver(session: &mut SessionState, cards: Vec<VenueCard>) -> Vec<OutboundMessage> {
        session.set_state(DialogState::ResultsDelivered);

        let mut messages = vec![OutboundMessage::Cards(cards)];
        let unused = session.unused_filters();
        if !unused.is_empty() {
            if session.quick_replies_enabled {
                messages.push(OutboundMessage::QuickReplies {
                    text: "Want me to narrow that down?".to_string(),
                    options: unused
                        .iter()
                        .map(|filter| QuickReply::new(filter.title(), filter.payload()))
                        .collect(),
                });
            } else {
                messages.push(OutboundMessage::text(refine_hint(&unused)));
            }
        }
        messages
    }

    /// Geocode soft failure: re-prompt for a location, naming the failed
    /// one when the provider detail carries it. No query survives.
    fn geocode_reprompt(
        session: &mut SessionState,
        built: &Query,
        detail: &str,
    ) -> Vec<OutboundMessage> {
        session.clear_last_query();
        session.set_category(built.category);
        session.set_state(DialogState::AwaitingLocation);

        let failed = detail
            .split_once(':')
            .map(|(_, rest)| rest.trim())
            .filter(|rest| !rest.is_empty());
        let text = failed.map_or_else(
            || "I couldn't find that place. Could you try another location?".to_string(),
            |place| format!("I couldn't find \"{place}\". Could you try another location?"),
        );
        vec![OutboundMessage::text(text)]
    }

    /// Empty or unusable result set: same degrade path as insufficient
    /// information, back to a location prompt.
    fn no_results(session: &mut SessionState, built: &Query) -> Vec<OutboundMessage> {
        session.clear_last_query();
        session.set_category(built.category);
        session.set_state(DialogState::AwaitingLocation);
        vec![OutboundMessage::text(format!(
            "I didn't find any {} spots there. Want to try a different location?",
            built.category
        ))]
    }

    fn help(session: &SessionState) -> Vec<OutboundMessage> {
        if session.quick_replies_enabled {
            vec![OutboundMessage::QuickReplies {
                text: "I find places nearby. Pick a category and then send me a \
                       location, or just tell me what you're looking for."
                    .to_string(),
                options: category_options(),
            }]
        } else {
            vec![OutboundMessage::text(
                "I find places nearby. Tell me what you're looking for and where, \
                 e.g. \"coffee near Alexanderplatz\". Say \"start over\" to reset.",
            )]
        }
    }

    fn start_over(session: &mut SessionState) -> Vec<OutboundMessage> {
        session.reset_conversation();
        if session.quick_replies_enabled {
            session.set_state(DialogState::AwaitingCategory);
            vec![OutboundMessage::QuickReplies {
                text: "Fresh start! What are you in the mood for?".to_string(),
                options: category_options(),
            }]
        } else {
            vec![OutboundMessage::text(
                "Fresh start! Tell me what you're looking for and where.",
            )]
        }
    }
}

fn category_options() -> Vec<QuickReply> {
    VenueCategory::ALL
        .iter()
        .map(|category| QuickReply::new(category.label(), category.label()))
        .collect()
}

fn location_prompt(category: Option<VenueCategory>) -> String {
    category.map_or_else(
        || "Where should I look? Share your location or type an address.".to_string(),
        |category| {
            format!("Where should I look for {category}? Share your location or type an address.")
        },
    )
}

fn refine_hint(unused: &[FollowUpFilter]) -> String {
    let options = unused
        .iter()
        .map(|filter| format!("\"{}\"", filter.payload()))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("Say {options} to narrow that down.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_prompt_names_the_category() {
        assert_eq!(
            location_prompt(Some(VenueCategory::Coffee)),
            "Where should I look for coffee? Share your location or type an address."
        );
        assert!(location_prompt(None).starts_with("Where should I look?"));
    }

    #[test]
    fn refine_hint_lists_remaining_filters() {
        assert_eq!(
            refine_hint(&[FollowUpFilter::OpenOnly, FollowUpFilter::SortByDistance]),
            "Say \"open only\" or \"sort by distance\" to narrow that down."
        );
        assert_eq!(
            refine_hint(&[FollowUpFilter::SortByDistance]),
            "Say \"sort by distance\" to narrow that down."
        );
    }

    #[test]
    fn category_options_cover_all_categories() {
        let options = category_options();
        assert_eq!(options.len(), VenueCategory::ALL.len());
        assert!(options.iter().any(|o| o.payload == "top picks"));
    }
}
