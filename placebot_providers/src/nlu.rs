//! NLU collaborator client (api.ai-style `/query` endpoint).
//!
//! The core only depends on the output contract: fulfillment text,
//! optional platform payloads, or an action/intent pair with parameters.
//! Everything shape-related is mapped onto [`ClassifiedEvent`] here, at
//! the boundary.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use placebot_core::{ActionKind, ClassifiedEvent, EventParameters, IntentClassifier, present};

use crate::retry::with_retries;

/// Pinned protocol version of the query endpoint.
const API_VERSION: &str = "20150910";

/// Delays between retry attempts, in seconds.
const RETRY_DELAYS: [u64; 2] = [2, 4];

pub struct ApiAiClassifier {
    client: Client,
    access_token: String,
    lang: String,
    base_url: String,
    /// Stable NLU session id per sender, so the service keeps its own
    /// conversation context across turns.
    sessions: Mutex<HashMap<String, Uuid>>,
}

impl ApiAiClassifier {
    pub fn new(access_token: String, lang: String, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating ApiAiClassifier (lang={lang})");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            access_token,
            lang,
            base_url: "https://api.api.ai".to_string(),
            sessions: Mutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn session_id(&self, sender_id: &str) -> Uuid {
        let mut sessions = self.sessions.lock().await;
        *sessions
            .entry(sender_id.to_string())
            .or_insert_with(Uuid::now_v7)
    }

    async fn try_query(&self, session_id: Uuid, text: &str) -> anyhow::Result<Value> {
        let response = self
            .client
            .post(format!("{}/v1/query?v={API_VERSION}", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&json!({
                "query": text,
                "lang": self.lang,
                "sessionId": session_id,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl IntentClassifier for ApiAiClassifier {
    async fn classify(&self, sender_id: &str, text: &str) -> anyhow::Result<ClassifiedEvent> {
        let session_id = self.session_id(sender_id).await;
        debug!("Classifying message for NLU session {session_id}");

        let response = with_retries(|| self.try_query(session_id, text), &RETRY_DELAYS).await?;
        let result = &response["result"];
        if result.is_null() {
            anyhow::bail!("Invalid response format: missing result");
        }
        classify_result(result)
    }
}

/// Map the service's result object onto the event sum type: platform
/// payloads first, fulfillment speech second, action/intent last.
fn classify_result(result: &Value) -> anyhow::Result<ClassifiedEvent> {
    let facebook = &result["fulfillment"]["data"]["facebook"];
    if let Some(payloads) = facebook.as_array() {
        return Ok(ClassifiedEvent::Payloads(payloads.clone()));
    }
    if facebook.is_object() {
        return Ok(ClassifiedEvent::Payloads(vec![facebook.clone()]));
    }
    if let Some(speech) = present(result["fulfillment"]["speech"].as_str()) {
        return Ok(ClassifiedEvent::Speech(speech.to_string()));
    }

    let action = present(result["action"].as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: no speech and no action"))?;
    Ok(ClassifiedEvent::Action {
        action: ActionKind::parse(action),
        intent: result["metadata"]["intentName"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        parameters: parameters_from(&result["parameters"]),
    })
}

fn parameters_from(value: &Value) -> EventParameters {
    EventParameters {
        venue: field(value, "venue"),
        location: field(value, "location").or_else(|| field(value, "address")),
        street: field(value, "street"),
        postal_code: field(value, "zip-code").or_else(|| field(value, "postal-code")),
        city: field(value, "city"),
        country: field(value, "country"),
        latitude: value["latitude"].as_f64(),
        longitude: value["longitude"].as_f64(),
    }
}

fn field(value: &Value, key: &str) -> Option<String> {
    present(value[key].as_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn speech_becomes_a_speech_event() {
        let result = json!({
            "fulfillment": { "speech": "Hi there!" },
            "action": "smalltalk.greetings"
        });
        let event = classify_result(&result).expect("speech present");
        assert_eq!(event, ClassifiedEvent::Speech("Hi there!".to_string()));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn platform_payloads_win_over_speech() {
        let result = json!({
            "fulfillment": {
                "speech": "ignored",
                "data": { "facebook": [ { "sender_action": "typing_on" } ] }
            }
        });
        let event = classify_result(&result).expect("payloads present");
        assert_eq!(
            event,
            ClassifiedEvent::Payloads(vec![json!({ "sender_action": "typing_on" })])
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn action_with_parameters_is_extracted() {
        let result = json!({
            "fulfillment": { "speech": "" },
            "action": "findVenue",
            "metadata": { "intentName": "FindVenue" },
            "parameters": { "venue": "coffee", "location": "Berlin" }
        });
        let event = classify_result(&result).expect("action present");
        match event {
            ClassifiedEvent::Action {
                action,
                intent,
                parameters,
            } => {
                assert_eq!(action, ActionKind::FindVenue);
                assert_eq!(intent, "FindVenue");
                assert_eq!(parameters.venue.as_deref(), Some("coffee"));
                assert_eq!(parameters.location.as_deref(), Some("Berlin"));
            }
            other => panic!("expected an action event, got {other:?}"),
        }
    }

    #[test]
    fn empty_result_is_an_error() {
        let result = json!({ "fulfillment": { "speech": "" } });
        assert!(classify_result(&result).is_err());
    }
}
