//! Inbound webhook payload shapes and event extraction.

use serde::Deserialize;
use serde_json::Value;

use placebot_core::present;

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    pub sender: Sender,
    #[serde(default)]
    pub message: Option<InboundMessage>,
    #[serde(default)]
    pub postback: Option<Postback>,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    id: Value,
}

impl Sender {
    /// Sender ids arrive as strings or as large integers depending on
    /// the platform era; both normalize to a string.
    #[must_use]
    pub fn id(&self) -> String {
        match &self.id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub is_echo: bool,
    #[serde(default)]
    pub quick_reply: Option<Postback>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub payload: Option<AttachmentPayload>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentPayload {
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// What one messaging event asks of the dialog core.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Free text to run through the NLU.
    Text(String),
    /// A quick-reply or postback payload, handled without the NLU.
    Postback(String),
    /// A shared location attachment.
    SharedLocation { lat: f64, long: f64 },
}

impl MessagingEvent {
    /// Extract the one thing this event carries. Echoes of our own
    /// messages and empty events yield nothing.
    #[must_use]
    pub fn inbound(&self) -> Option<InboundEvent> {
        if let Some(message) = &self.message {
            if message.is_echo {
                return None;
            }
            if let Some(quick_reply) = &message.quick_reply {
                return Some(InboundEvent::Postback(quick_reply.payload.clone()));
            }
            for attachment in &message.attachments {
                if attachment.kind.as_deref() == Some("location") {
                    if let Some(coordinates) = attachment
                        .payload
                        .as_ref()
                        .and_then(|payload| payload.coordinates.as_ref())
                    {
                        return Some(InboundEvent::SharedLocation {
                            lat: coordinates.lat,
                            long: coordinates.long,
                        });
                    }
                }
            }
            if let Some(text) = present(message.text.as_deref()) {
                return Some(InboundEvent::Text(text.to_string()));
            }
            return None;
        }
        self.postback
            .as_ref()
            .map(|postback| InboundEvent::Postback(postback.payload.clone()))
    }
}
