use std::sync::Arc;

use tokio::sync::broadcast;

pub mod error;
pub mod ingestion;
pub mod qa;
pub mod session;
pub mod source;
pub mod transcript;
pub mod transport;

pub use error::ClientError;
pub use ingestion::{IngestionController, IngestionOutcome};
pub use qa::{AskOutcome, QaController};
pub use session::SessionState;
pub use source::{FilePayload, Source, SourceSelection};
pub use transcript::{InMemoryTranscript, Message, TranscriptStore};
pub use transport::{Backend, HttpBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusLine {
    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Neutral,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    StatusChanged(StatusLine),
    /// Ingestion succeeded; the QA workflow should be shown.
    SourceActivated { filename: String },
    /// A question was taken; the input field should be cleared.
    QuestionAccepted,
    TranscriptUpdated,
}

/// Owns the session, transcript and both workflows for one user session.
pub struct ChatController {
    session: Arc<SessionState>,
    transcript: Arc<dyn TranscriptStore>,
    ingestion: IngestionController,
    qa: QaController,
    events: broadcast::Sender<ClientEvent>,
}

impl ChatController {
    pub fn connect(server_url: &str) -> Result<Self, ClientError> {
        let backend = HttpBackend::new(server_url)?;
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::new_with_dependencies(backend, Arc::new(InMemoryTranscript::new()))
    }

    pub fn new_with_dependencies(
        backend: Arc<dyn Backend>,
        transcript: Arc<dyn TranscriptStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let session = Arc::new(SessionState::new());
        Self {
            ingestion: IngestionController::new(
                Arc::clone(&backend),
                Arc::clone(&session),
                events.clone(),
            ),
            qa: QaController::new(
                backend,
                Arc::clone(&session),
                Arc::clone(&transcript),
                events.clone(),
            ),
            session,
            transcript,
            events,
        }
    }

    pub async fn submit(&self, selection: SourceSelection) -> IngestionOutcome {
        self.ingestion.submit(selection).await
    }

    pub async fn ask(&self, question: &str) -> AskOutcome {
        self.qa.ask(question).await
    }

    pub async fn status(&self) -> Option<StatusLine> {
        self.ingestion.status().await
    }

    pub async fn active_filename(&self) -> Option<String> {
        self.session.active_filename().await
    }

    pub async fn qa_enabled(&self) -> bool {
        self.qa.enabled().await
    }

    pub async fn transcript(&self) -> Vec<Message> {
        self.transcript.messages().await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
