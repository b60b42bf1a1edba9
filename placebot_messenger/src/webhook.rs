//! Webhook endpoint: verification handshake, signature check, and
//! fan-in of messaging events into the dialog engine.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tracing::{error, info, warn};

use placebot_core::{ClassifiedEvent, IntentClassifier, MessageTransport, OutboundMessage};
use placebot_dialog::DialogEngine;

use crate::event::{InboundEvent, WebhookPayload};
use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Everything the webhook handlers need.
pub struct WebhookState {
    pub engine: DialogEngine,
    pub classifier: Arc<dyn IntentClassifier>,
    pub transport: Arc<dyn MessageTransport>,
    pub verify_token: String,
    /// Enables `X-Hub-Signature-256` verification when set.
    pub app_secret: Option<String>,
}

/// Build the webhook router.
pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook", get(verify).post(receive))
        .with_state(state)
}

/// Serve the webhook until the process is stopped.
pub async fn serve(state: Arc<WebhookState>, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Webhook listening on port {port}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.verify_token", default)]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    challenge: Option<String>,
}

/// GET /webhook - the platform's subscription handshake.
async fn verify(
    State(state): State<Arc<WebhookState>>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    if params.verify_token.as_deref() == Some(state.verify_token.as_str()) {
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        warn!("Webhook verification attempt with a wrong token");
        (
            StatusCode::FORBIDDEN,
            "Error, wrong validation token".to_string(),
        )
    }
}

/// POST /webhook - inbound messaging events.
///
/// Events are processed in the background; the platform only needs the
/// acknowledgment. A turn that never completes produces no reply.
async fn receive(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Some(app_secret) = &state.app_secret {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|value| value.to_str().ok());
        if let Err(e) = verify_signature(app_secret.as_bytes(), &body, signature) {
            warn!("Rejecting webhook call: {e}");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "status": "forbidden" })),
            );
        }
    }

    let Ok(payload) = serde_json::from_slice::<WebhookPayload>(&body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "status": "error" })));
    };

    for entry in payload.entry {
        for event in entry.messaging {
            let Some(inbound) = event.inbound() else {
                continue;
            };
            let sender_id = event.sender.id();
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                process_event(&state, &sender_id, inbound).await;
            });
        }
    }

    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn process_event(state: &WebhookState, sender_id: &str, inbound: InboundEvent) {
    let classified = match inbound {
        InboundEvent::Postback(payload) => ClassifiedEvent::Postback(payload),
        InboundEvent::SharedLocation { lat, long } => ClassifiedEvent::SharedLocation { lat, long },
        InboundEvent::Text(text) => {
            // Show activity while the NLU call is in flight.
            deliver(state, sender_id, &OutboundMessage::Typing).await;
            match state.classifier.classify(sender_id, &text).await {
                Ok(classified) => classified,
                Err(e) => {
                    error!("NLU classification failed for sender {sender_id}: {e}");
                    return;
                }
            }
        }
    };

    let messages = state.engine.handle_event(sender_id, classified).await;
    for message in &messages {
        deliver(state, sender_id, message).await;
    }
}

/// Fire-and-forget delivery; failures are logged and never fed back
/// into dialog state.
async fn deliver(state: &WebhookState, recipient_id: &str, message: &OutboundMessage) {
    if let Err(e) = state.transport.deliver(recipient_id, message).await {
        error!("Error sending message to {recipient_id}: {e}");
    }
}

/// Verify an `X-Hub-Signature-256` header (`sha256=<hex>`) against the
/// raw request body, in constant time.
fn verify_signature(secret: &[u8], body: &[u8], signature: Option<&str>) -> Result<()> {
    let signature = signature.ok_or(Error::Signature)?;
    let hex_sig = signature.strip_prefix("sha256=").unwrap_or(signature);
    let expected = hex_decode(hex_sig).ok_or(Error::Signature)?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::Signature)?;
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| Error::Signature)
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}
