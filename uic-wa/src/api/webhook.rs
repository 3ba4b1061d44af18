//! WhatsApp webhook endpoint for Twilio integration
//!
//! Twilio delivers inbound messages as form posts and expects a TwiML
//! XML document in the response body; whatever `<Message>` contains
//! goes back to the user. Engine failures are converted to a generic
//! apology here so the user always gets a well-formed reply and
//! internal details never leak.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::flow::messages;
use crate::AppState;

/// Inbound Twilio form payload
#[derive(Debug, Deserialize)]
pub struct TwilioInbound {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "MessageSid")]
    pub message_sid: Option<String>,
}

/// POST /whatsapp/webhook
pub async fn whatsapp_webhook(
    State(state): State<AppState>,
    Form(inbound): Form<TwilioInbound>,
) -> Response {
    // Twilio prefixes WhatsApp numbers with "whatsapp:"
    let phone_number = inbound.from.trim_start_matches("whatsapp:");

    info!(
        phone_number,
        message_length = inbound.body.len(),
        message_sid = inbound.message_sid.as_deref().unwrap_or(""),
        "Received WhatsApp message"
    );

    let text = match state.flow.process_message(phone_number, &inbound.body).await {
        Ok(reply) => {
            if let Some(completion) = &reply.completion {
                info!(
                    phone_number,
                    uic_code = %completion.uic_code,
                    is_new = completion.is_new,
                    "UIC delivered"
                );
            }
            reply.response
        }
        Err(e) => {
            error!(phone_number, "Error processing webhook: {}", e);
            messages::apology(state.language).to_string()
        }
    };

    twiml_response(&text)
}

/// Cleanup response for the external scheduler
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub status: String,
    pub sessions_cleaned: u64,
}

/// POST /whatsapp/cleanup
///
/// Deletes expired sessions; intended to be driven by a cron job.
pub async fn cleanup_sessions(State(state): State<AppState>) -> Response {
    match state.flow.cleanup_expired().await {
        Ok(count) => {
            info!(sessions_removed = count, "Manual cleanup triggered");
            Json(CleanupResponse {
                status: "success".to_string(),
                sessions_cleaned: count,
            })
            .into_response()
        }
        Err(e) => {
            error!("Cleanup failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Wrap message text in a TwiML response document
fn twiml_response(text: &str) -> Response {
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(text)
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        xml,
    )
        .into_response()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
