//! Messenger Graph API send client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use placebot_core::{MessageTransport, OutboundMessage, QuickReply, VenueCard};

use crate::{Error, Result};

/// The generic template renders at most this many card elements.
const GENERIC_TEMPLATE_LIMIT: usize = 10;

pub struct MessengerClient {
    client: Client,
    page_access_token: String,
    base_url: String,
}

impl MessengerClient {
    pub fn new(page_access_token: String, timeout: Duration) -> Result<Self> {
        info!("Creating MessengerClient");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            page_access_token,
            base_url: "https://graph.facebook.com/v2.6".to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn post_body(&self, body: Value) -> Result<()> {
        debug!("Posting message to Graph API");
        let response = self
            .client
            .post(format!("{}/me/messages", self.base_url))
            .query(&[("access_token", self.page_access_token.as_str())])
            .json(&body)
            .send()
            .await?
            .json::<Value>()
            .await?;

        match response.get("error") {
            Some(error) if !error.is_null() => Err(Error::Send(error.to_string())),
            _ => Ok(()),
        }
    }
}

/// Render one outbound message into the Graph API request body.
fn message_body(recipient_id: &str, message: &OutboundMessage) -> Value {
    let recipient = json!({ "id": recipient_id });
    match message {
        OutboundMessage::Text { text } => json!({
            "recipient": recipient,
            "message": { "text": text }
        }),
        OutboundMessage::QuickReplies { text, options } => json!({
            "recipient": recipient,
            "message": {
                "text": text,
                "quick_replies": options.iter().map(quick_reply).collect::<Vec<_>>()
            }
        }),
        OutboundMessage::Cards(cards) => json!({
            "recipient": recipient,
            "message": { "attachment": { "type": "template", "payload": {
                "template_type": "generic",
                "elements": cards
                    .iter()
                    .take(GENERIC_TEMPLATE_LIMIT)
                    .map(card_element)
                    .collect::<Vec<_>>()
            } } }
        }),
        OutboundMessage::Typing => json!({
            "recipient": recipient,
            "sender_action": "typing_on"
        }),
        // Verbatim classifier payloads: a sender-action entry becomes a
        // sender action, everything else is sent as a message body.
        OutboundMessage::Platform(value) => {
            match value.get("sender_action").and_then(Value::as_str) {
                Some(action) => json!({ "recipient": recipient, "sender_action": action }),
                None => json!({ "recipient": recipient, "message": value }),
            }
        }
    }
}

fn quick_reply(option: &QuickReply) -> Value {
    json!({
        "content_type": "text",
        "title": option.title,
        "payload": option.payload
    })
}

fn card_element(card: &VenueCard) -> Value {
    let mut element = json!({
        "title": card.title,
        "subtitle": card.subtitle,
        "buttons": card
            .buttons
            .iter()
            .map(|button| json!({ "type": "web_url", "url": button.url, "title": button.title }))
            .collect::<Vec<_>>(),
    });
    if let Some(image_url) = &card.image_url {
        element["image_url"] = json!(image_url);
    }
    element
}

#[async_trait]
impl MessageTransport for MessengerClient {
    async fn deliver(&self, recipient_id: &str, message: &OutboundMessage) -> anyhow::Result<()> {
        self.post_body(message_body(recipient_id, message)).await?;
        Ok(())
    }
}
