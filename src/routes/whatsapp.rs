use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::assistant::{self, Intent};
use crate::constants::{
    ERR_VERIFICATION_FAILED, FALLBACK_REPLY, SIGNATURE_HEADER, SIGNUP_PROMPT, SUBSCRIBE_MODE,
};
use crate::db;
use crate::error::{AppError, Result};
use crate::whatsapp::{verify_signature, InboundText, WebhookPayload};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WebhookResponse {
    Reply { reply: String },
    Status { status: &'static str },
}

/// Webhook handshake
///
/// Meta calls this once when the webhook is registered and expects the
/// challenge echoed back when the token matches.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let mode_ok = params.mode.as_deref() == Some(SUBSCRIBE_MODE);
    let token_ok = params.verify_token.as_deref() == Some(state.config.whatsapp_verify_token.as_str());

    if mode_ok && token_ok {
        tracing::info!("WhatsApp webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        tracing::warn!("Failed webhook verification (mode: {:?})", params.mode);
        (StatusCode::FORBIDDEN, ERR_VERIFICATION_FAILED).into_response()
    }
}

/// Inbound message notification
///
/// # Flow
/// 1. Signature check (only when an app secret is configured)
/// 2. Extract the first text message; anything else is acknowledged and ignored
/// 3. Resolve the sender to a user, or ask them to sign up
/// 4. Let the model pick a capture tool and run it
/// 5. Send the confirmation back over WhatsApp
pub async fn receive_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>> {
    if let Some(app_secret) = &state.config.whatsapp_app_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        if !verify_signature(&body, signature, app_secret) {
            tracing::warn!("Rejecting webhook delivery with invalid signature");
            return Err(AppError::InvalidSignature);
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)?;

    let Some(message) = payload.first_text_message() else {
        tracing::debug!("Webhook delivery without a text message");
        return Ok(Json(WebhookResponse::Status { status: "success" }));
    };

    let reply = respond(&state, &message).await?;
    Ok(Json(WebhookResponse::Reply { reply }))
}

/// Handle one text message end to end and return the text sent back
async fn respond(state: &AppState, message: &InboundText) -> Result<String> {
    let Some(user) = db::users::find_by_phone_number(&state.db, &message.from).await? else {
        tracing::warn!("Message from unregistered number {}", message.from);
        state.messenger.send_text(&message.from, SIGNUP_PROMPT).await?;
        return Ok(SIGNUP_PROMPT.to_string());
    };

    let today = Local::now().date_naive();
    let intent = state.classifier.classify(&message.body, today).await?;

    let reply = match intent {
        Intent::Tool(call) => {
            tracing::info!("Running {} for user {}", call.name(), user.id);
            assistant::execute(&state.db, &user.id, call, today).await?
        }
        Intent::Reply(text) if !text.trim().is_empty() => text,
        Intent::Reply(_) => FALLBACK_REPLY.to_string(),
        Intent::Unrecognized(tool) => {
            tracing::warn!("Cannot act on tool {} for user {}", tool, user.id);
            FALLBACK_REPLY.to_string()
        }
    };

    state.messenger.send_text(&message.from, &reply).await?;
    Ok(reply)
}
