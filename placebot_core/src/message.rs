//! Outbound message payloads produced by the dialog engine.
//!
//! The engine only decides *what* to say; rendering into the chat
//! platform's wire format is the transport's job.

use serde::{Deserialize, Serialize};

/// A tappable quick-reply option offered alongside a text prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub title: String,
    pub payload: String,
}

impl QuickReply {
    #[must_use]
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: payload.into(),
        }
    }
}

/// A URL button on a venue card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardButton {
    pub title: String,
    pub url: String,
}

/// One venue rendered as a display card.
///
/// The title is always present (venues without a name or id are never
/// rendered); the subtitle is the open/closed status text, empty when
/// unknown. Cards carry one or two buttons: "visit website" always, and
/// "show on map" only when a map-worthy location could be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueCard {
    pub title: String,
    pub image_url: Option<String>,
    pub subtitle: String,
    pub buttons: Vec<CardButton>,
}

/// One outbound message, dispatched by the caller of the dialog engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Plain text, already within the platform length limit.
    Text { text: String },
    /// A text prompt with tappable options.
    QuickReplies {
        text: String,
        options: Vec<QuickReply>,
    },
    /// An ordered card carousel.
    Cards(Vec<VenueCard>),
    /// A "typing" indicator.
    Typing,
    /// A platform-specific payload relayed verbatim from the classifier.
    Platform(serde_json::Value),
}

impl OutboundMessage {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}
