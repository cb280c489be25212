use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::{
    error::ClientError,
    session::SessionState,
    source::{Source, SourceSelection},
    transport::Backend,
    ClientEvent, StatusLine,
};

pub const PROCESSING_STATUS: &str = "Processing source... This may take a moment.";
pub const INGESTION_FALLBACK: &str = "Unknown error occurred.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionOutcome {
    Ingested { filename: String },
    /// A newer submission settled first; this response was dropped.
    Superseded,
    Rejected(ClientError),
}

pub struct IngestionController {
    backend: Arc<dyn Backend>,
    session: Arc<SessionState>,
    status: RwLock<Option<StatusLine>>,
    events: broadcast::Sender<ClientEvent>,
}

impl IngestionController {
    pub fn new(
        backend: Arc<dyn Backend>,
        session: Arc<SessionState>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            backend,
            session,
            status: RwLock::new(None),
            events,
        }
    }

    pub async fn status(&self) -> Option<StatusLine> {
        self.status.read().await.clone()
    }

    async fn set_status(&self, status: StatusLine) {
        *self.status.write().await = Some(status.clone());
        let _ = self.events.send(ClientEvent::StatusChanged(status));
    }

    pub async fn submit(&self, selection: SourceSelection) -> IngestionOutcome {
        let source = match Source::try_from(selection) {
            Ok(source) => source,
            Err(err) => {
                self.set_status(StatusLine::error(err.user_message(INGESTION_FALLBACK)))
                    .await;
                return IngestionOutcome::Rejected(err);
            }
        };

        self.set_status(StatusLine::neutral(PROCESSING_STATUS)).await;
        let ticket = self.session.issue_ticket().await;
        debug!(?ticket, source = source.describe(), "ingestion: submitted");

        match self.backend.upload(&source).await {
            Ok(response) => {
                if !self
                    .session
                    .activate(ticket, response.filename.clone())
                    .await
                {
                    debug!(
                        ?ticket,
                        filename = %response.filename,
                        "ingestion: dropping stale response"
                    );
                    return IngestionOutcome::Superseded;
                }
                info!(filename = %response.filename, "ingestion: source activated");
                self.set_status(StatusLine::success(response.message)).await;
                let _ = self.events.send(ClientEvent::SourceActivated {
                    filename: response.filename.clone(),
                });
                IngestionOutcome::Ingested {
                    filename: response.filename,
                }
            }
            Err(err) => {
                if !self.session.settle(ticket).await {
                    debug!(?ticket, %err, "ingestion: dropping stale failure");
                    return IngestionOutcome::Superseded;
                }
                debug!(%err, "ingestion: rejected");
                self.set_status(StatusLine::error(err.user_message(INGESTION_FALLBACK)))
                    .await;
                IngestionOutcome::Rejected(err)
            }
        }
    }
}
