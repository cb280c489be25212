use tokio::sync::RwLock;

/// Issued to each ingestion before its request goes out. Tickets grow
/// monotonically in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IngestionTicket(u64);

#[derive(Default)]
struct SessionInner {
    active_filename: Option<String>,
    last_issued: u64,
    last_settled: u64,
}

/// The currently active ingested source, shared by both controllers.
#[derive(Default)]
pub struct SessionState {
    inner: RwLock<SessionInner>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn active_filename(&self) -> Option<String> {
        self.inner.read().await.active_filename.clone()
    }

    pub async fn has_active_source(&self) -> bool {
        self.inner.read().await.active_filename.is_some()
    }

    pub(crate) async fn issue_ticket(&self) -> IngestionTicket {
        let mut guard = self.inner.write().await;
        guard.last_issued += 1;
        IngestionTicket(guard.last_issued)
    }

    /// Marks `ticket` as resolved. Returns false when a newer ingestion has
    /// already settled, in which case the response must be dropped.
    pub(crate) async fn settle(&self, ticket: IngestionTicket) -> bool {
        let mut guard = self.inner.write().await;
        if ticket.0 < guard.last_settled {
            return false;
        }
        guard.last_settled = ticket.0;
        true
    }

    /// Settles `ticket` and, unless stale, makes `filename` the active source.
    pub(crate) async fn activate(&self, ticket: IngestionTicket, filename: String) -> bool {
        let mut guard = self.inner.write().await;
        if ticket.0 < guard.last_settled {
            return false;
        }
        guard.last_settled = ticket.0;
        guard.active_filename = Some(filename);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_without_active_source() {
        let session = SessionState::new();
        assert_eq!(session.active_filename().await, None);
        assert!(!session.has_active_source().await);
    }

    #[tokio::test]
    async fn later_activation_overwrites_earlier() {
        let session = SessionState::new();
        let first = session.issue_ticket().await;
        assert!(session.activate(first, "a.txt".into()).await);
        let second = session.issue_ticket().await;
        assert!(session.activate(second, "b.txt".into()).await);
        assert_eq!(session.active_filename().await.as_deref(), Some("b.txt"));
    }

    #[tokio::test]
    async fn stale_ticket_is_dropped_after_newer_settles() {
        let session = SessionState::new();
        let older = session.issue_ticket().await;
        let newer = session.issue_ticket().await;

        assert!(session.activate(newer, "new.pdf".into()).await);
        assert!(!session.activate(older, "old.pdf".into()).await);
        assert_eq!(session.active_filename().await.as_deref(), Some("new.pdf"));
    }

    #[tokio::test]
    async fn failed_newer_ingestion_still_supersedes_older() {
        let session = SessionState::new();
        let older = session.issue_ticket().await;
        let newer = session.issue_ticket().await;

        assert!(session.settle(newer).await);
        assert!(!session.activate(older, "old.pdf".into()).await);
        assert_eq!(session.active_filename().await, None);
    }
}
