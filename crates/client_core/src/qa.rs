use std::sync::Arc;

use shared::protocol::AskRequest;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    error::ClientError,
    session::SessionState,
    transcript::{Message, TranscriptStore},
    transport::Backend,
    ClientEvent,
};

pub const ASK_FALLBACK: &str = "Failed to get an answer.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// Empty question or no active source; nothing was appended or sent.
    Skipped,
    Answered,
    Failed(ClientError),
}

pub struct QaController {
    backend: Arc<dyn Backend>,
    session: Arc<SessionState>,
    transcript: Arc<dyn TranscriptStore>,
    events: broadcast::Sender<ClientEvent>,
}

impl QaController {
    pub fn new(
        backend: Arc<dyn Backend>,
        session: Arc<SessionState>,
        transcript: Arc<dyn TranscriptStore>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            backend,
            session,
            transcript,
            events,
        }
    }

    pub async fn enabled(&self) -> bool {
        self.session.has_active_source().await
    }

    pub async fn ask(&self, question: &str) -> AskOutcome {
        let question = question.trim();
        if question.is_empty() {
            return AskOutcome::Skipped;
        }
        let Some(filename) = self.session.active_filename().await else {
            return AskOutcome::Skipped;
        };

        self.transcript.append(Message::user(question)).await;
        let _ = self.events.send(ClientEvent::QuestionAccepted);

        let placeholder = self.transcript.append(Message::placeholder()).await;
        let _ = self.events.send(ClientEvent::TranscriptUpdated);

        let request = AskRequest {
            question: question.to_string(),
            filename,
        };
        let result = self.backend.ask(&request).await;

        // The placeholder goes before anything else lands for this turn.
        self.transcript.remove(placeholder).await;

        let outcome = match result {
            Ok(response) => {
                debug!(filename = %request.filename, score = ?response.score, "ask: answered");
                self.transcript
                    .append(Message::answer(response.answer, response.source_context))
                    .await;
                AskOutcome::Answered
            }
            Err(err) => {
                debug!(filename = %request.filename, %err, "ask: failed");
                self.transcript
                    .append(Message::ai_error(err.user_message(ASK_FALLBACK)))
                    .await;
                AskOutcome::Failed(err)
            }
        };
        let _ = self.events.send(ClientEvent::TranscriptUpdated);
        outcome
    }
}
