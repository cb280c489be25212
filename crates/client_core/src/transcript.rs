use async_trait::async_trait;
use shared::domain::{MessageHandle, Sender};
use tokio::sync::Mutex;

pub const PLACEHOLDER_TEXT: &str = "Thinking...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub source_context: Option<String>,
    pub is_placeholder: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            source_context: None,
            is_placeholder: false,
        }
    }

    pub fn answer(text: impl Into<String>, source_context: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            source_context: Some(source_context.into()),
            is_placeholder: false,
        }
    }

    pub fn ai_error(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            source_context: None,
            is_placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            sender: Sender::Ai,
            text: PLACEHOLDER_TEXT.to_string(),
            source_context: None,
            is_placeholder: true,
        }
    }
}

/// Append-only message log. `remove` exists only to retract a placeholder
/// previously returned by `append`.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn append(&self, message: Message) -> MessageHandle;
    async fn remove(&self, handle: MessageHandle) -> Option<Message>;
    async fn messages(&self) -> Vec<Message>;
}

#[derive(Default)]
struct TranscriptInner {
    next_handle: u64,
    entries: Vec<(MessageHandle, Message)>,
}

#[derive(Default)]
pub struct InMemoryTranscript {
    inner: Mutex<TranscriptInner>,
}

impl InMemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed messages appended after `cursor`, with the cursor to pass
    /// next time. Placeholders are skipped.
    pub async fn committed_since(
        &self,
        cursor: Option<MessageHandle>,
    ) -> (Vec<Message>, Option<MessageHandle>) {
        let guard = self.inner.lock().await;
        let mut last = cursor;
        let fresh: Vec<Message> = guard
            .entries
            .iter()
            .filter(|(handle, message)| {
                !message.is_placeholder && cursor.map_or(true, |cursor| *handle > cursor)
            })
            .map(|(handle, message)| {
                last = Some(*handle);
                message.clone()
            })
            .collect();
        (fresh, last)
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscript {
    async fn append(&self, message: Message) -> MessageHandle {
        let mut guard = self.inner.lock().await;
        guard.next_handle += 1;
        let handle = MessageHandle(guard.next_handle);
        guard.entries.push((handle, message));
        handle
    }

    async fn remove(&self, handle: MessageHandle) -> Option<Message> {
        let mut guard = self.inner.lock().await;
        let index = guard
            .entries
            .iter()
            .position(|(candidate, _)| *candidate == handle)?;
        Some(guard.entries.remove(index).1)
    }

    async fn messages(&self) -> Vec<Message> {
        let guard = self.inner.lock().await;
        guard
            .entries
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }
}
