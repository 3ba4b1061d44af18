//! Conversation state machine
//!
//! Consumes one inbound message at a time, drives the session store,
//! and hands the five collected answers to the minter at the terminal
//! transition. Reserved commands are checked before session lookup so
//! a user can always RESTART or ask for HELP mid-flow; an expired
//! session is indistinguishable from no session at all.

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uic_common::config::Language;
use uic_common::Result;

use super::messages;
use super::session::Session;
use super::steps::STEPS;
use crate::db::records::FingerprintIndex;
use crate::db::sessions::SessionStore;
use crate::uic::{CollectedAnswers, UicMinter};

/// Outcome of processing one inbound message
#[derive(Debug, Clone)]
pub struct FlowReply {
    /// Text to send back to the user
    pub response: String,
    /// Whether the conversation just completed
    pub is_complete: bool,
    /// Present only when `is_complete` is true
    pub completion: Option<Completion>,
}

impl FlowReply {
    fn text(response: String) -> FlowReply {
        FlowReply {
            response,
            is_complete: false,
            completion: None,
        }
    }
}

/// The collected answers plus the identifier they resolved to
#[derive(Debug, Clone)]
pub struct Completion {
    pub answers: CollectedAnswers,
    pub uic_code: String,
    pub is_new: bool,
}

/// The conversation flow engine.
///
/// Constructed once at startup with its collaborators injected, so
/// tests can substitute fakes for the persistence abstractions.
pub struct FlowEngine<S, F> {
    store: S,
    minter: UicMinter<F>,
    session_timeout: Duration,
    language: Language,
}

impl<S: SessionStore, F: FingerprintIndex> FlowEngine<S, F> {
    pub fn new(
        store: S,
        minter: UicMinter<F>,
        session_timeout_minutes: i64,
        language: Language,
    ) -> Self {
        Self {
            store,
            minter,
            session_timeout: Duration::minutes(session_timeout_minutes),
            language,
        }
    }

    /// Process one inbound message and produce the reply.
    pub async fn process_message(&self, phone_number: &str, message: &str) -> Result<FlowReply> {
        let message = message.trim();

        // Reserved commands take precedence over whatever step is pending
        if message.eq_ignore_ascii_case("restart") {
            self.store.delete(phone_number).await?;
            let session = self.create_session(phone_number).await?;
            info!(phone_number, "Session restarted");
            return Ok(FlowReply::text(welcome_text(session.language)));
        }
        if message.eq_ignore_ascii_case("help") {
            return Ok(FlowReply::text(messages::help(self.language).to_string()));
        }

        let now = Utc::now();
        let session = match self.store.get(phone_number).await? {
            Some(s) if s.is_expired(now) => {
                info!(phone_number, "Session expired, starting over");
                self.store.delete(phone_number).await?;
                None
            }
            other => other,
        };

        // No live session: greet and ask question 0. The message that
        // woke us up is not validated against anything.
        let Some(session) = session else {
            let session = self.create_session(phone_number).await?;
            info!(phone_number, "Created new session");
            return Ok(FlowReply::text(welcome_text(session.language)));
        };

        let Some(step) = STEPS.get(session.current_step) else {
            // A persisted session past the last step should not exist;
            // recover by starting over.
            warn!(
                phone_number,
                current_step = session.current_step,
                "Session beyond final step, restarting"
            );
            self.store.delete(phone_number).await?;
            let session = self.create_session(phone_number).await?;
            return Ok(FlowReply::text(welcome_text(session.language)));
        };

        if let Err(error_text) = step.validator.validate(message) {
            warn!(phone_number, step = step.key, error = error_text, "Validation failed");
            return Ok(FlowReply::text(format!(
                "❌ {}\n\n{}",
                error_text,
                step.question(session.language)
            )));
        }

        let language = session.language;
        let session = session.advance(step.field, message, now);
        info!(
            phone_number,
            step = step.key,
            answer_length = message.len(),
            "Answer stored"
        );

        if let Some(next) = STEPS.get(session.current_step) {
            self.store.upsert(&session).await?;
            return Ok(FlowReply::text(format!(
                "{}\n\n{}",
                messages::acknowledgment(language),
                next.question(language)
            )));
        }

        // Terminal transition: the session is gone the moment the
        // identifier lookup/creation runs, success or failure.
        let answers = session.collect()?;
        self.store.delete(phone_number).await?;

        let outcome = self.minter.mint_or_reuse(phone_number, &answers).await?;
        info!(
            phone_number,
            uic_code = %outcome.uic_code,
            is_new = outcome.is_new,
            "Conversation complete, UIC delivered"
        );

        Ok(FlowReply {
            response: messages::uic_delivered(language, &outcome.uic_code, outcome.is_new),
            is_complete: true,
            completion: Some(Completion {
                answers,
                uic_code: outcome.uic_code,
                is_new: outcome.is_new,
            }),
        })
    }

    /// Delete all expired sessions, returning the count removed.
    /// Driven by the cleanup endpoint and the background sweep.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let count = self.store.delete_all_expired(Utc::now()).await?;
        if count > 0 {
            info!(count, "Cleaned up expired sessions");
        }
        Ok(count)
    }

    async fn create_session(&self, phone_number: &str) -> Result<Session> {
        let session = Session::new(phone_number, self.language, Utc::now(), self.session_timeout);
        self.store.upsert(&session).await?;
        Ok(session)
    }
}

fn welcome_text(language: Language) -> String {
    format!(
        "{}\n\n{}",
        messages::welcome(language),
        STEPS[0].question(language)
    )
}
