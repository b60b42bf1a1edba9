#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;

pub mod category;
pub mod chunk;
pub mod location;
pub mod message;
pub mod places;

pub use category::VenueCategory;
pub use location::Location;
pub use message::{CardButton, OutboundMessage, QuickReply, VenueCard};
pub use places::{ExploreResponse, FollowUpFilter, Query};

/// One inbound event after classification, as a tagged variant instead of
/// a bag of optional fields probed ad hoc.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    /// Fulfillment text from the classifier, relayed to the user as-is
    /// (chunked to the platform text limit).
    Speech(String),
    /// Platform-specific payloads from the classifier, relayed verbatim.
    Payloads(Vec<serde_json::Value>),
    /// A recognized action/intent pair with its extracted parameters.
    Action {
        action: ActionKind,
        intent: String,
        parameters: EventParameters,
    },
    /// A raw quick-reply or postback payload that bypasses the classifier.
    Postback(String),
    /// A location attachment shared from the chat client. More
    /// authoritative than any typed location text.
    SharedLocation { lat: f64, long: f64 },
}

/// Action names the dialog engine knows how to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    FindVenue,
    Help,
    StartOver,
    Other(String),
}

impl ActionKind {
    #[must_use]
    pub fn parse(action: &str) -> Self {
        match action {
            "findVenue" => Self::FindVenue,
            "help" => Self::Help,
            "startOver" => Self::StartOver,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Structured parameters extracted from a classified message.
///
/// Every field is optional; use [`present`] to decide whether a textual
/// field carries a usable value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventParameters {
    pub venue: Option<String>,
    pub location: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The one predicate for "is this optional field meaningfully present":
/// non-empty after trimming.
#[must_use]
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Classifies raw message text into a [`ClassifiedEvent`].
///
/// Implemented by the external NLU collaborator; the core only relies on
/// this output contract.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, sender_id: &str, text: &str) -> anyhow::Result<ClassifiedEvent>;
}

/// Resolves a venue query against the external places-search service.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn explore(&self, query: &Query) -> anyhow::Result<ExploreResponse>;
}

/// Delivers one outbound message to a recipient. Fire-and-forget from the
/// dialog core's perspective; errors are logged by the caller.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn deliver(&self, recipient_id: &str, message: &OutboundMessage) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_actions() {
        assert_eq!(ActionKind::parse("findVenue"), ActionKind::FindVenue);
        assert_eq!(ActionKind::parse("help"), ActionKind::Help);
        assert_eq!(ActionKind::parse("startOver"), ActionKind::StartOver);
        assert_eq!(
            ActionKind::parse("smalltalk.greetings"),
            ActionKind::Other("smalltalk.greetings".to_string())
        );
    }

    #[test]
    fn present_rejects_blank_values() {
        assert_eq!(present(Some("  Berlin ")), Some("Berlin"));
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(None), None);
    }
}
