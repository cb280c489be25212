//! Plain-text rendering of the status line and transcript.

use std::{
    io::{self, Write},
    sync::Arc,
};

use client_core::{
    transcript::{InMemoryTranscript, PLACEHOLDER_TEXT},
    Message, StatusLine, StatusTone, TranscriptStore,
};
use shared::domain::{MessageHandle, Sender};

pub fn format_status(status: &StatusLine) -> String {
    let marker = match status.tone {
        StatusTone::Neutral => "..",
        StatusTone::Success => "ok",
        StatusTone::Error => "!!",
    };
    format!("[{marker}] {}", status.text)
}

pub fn format_message(message: &Message) -> String {
    let mut out = format!("{}> {}", speaker(message.sender), message.text);
    if let Some(source_context) = &message.source_context {
        out.push_str("\n   Source Context:");
        for line in source_context.lines() {
            out.push_str("\n   | ");
            out.push_str(line);
        }
    }
    out
}

fn speaker(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "you",
        Sender::Ai => "ai",
    }
}

/// Prints committed transcript entries once each, in order.
pub struct TerminalView {
    transcript: Arc<InMemoryTranscript>,
    cursor: Option<MessageHandle>,
    pending: usize,
}

impl TerminalView {
    pub fn new(transcript: Arc<InMemoryTranscript>) -> Self {
        Self {
            transcript,
            cursor: None,
            pending: 0,
        }
    }

    pub async fn flush(&mut self) {
        let (fresh, cursor) = self.transcript.committed_since(self.cursor).await;
        self.cursor = cursor;
        for message in &fresh {
            println!("{}", format_message(message));
        }

        let pending = self
            .transcript
            .messages()
            .await
            .iter()
            .filter(|message| message.is_placeholder)
            .count();
        if pending > self.pending {
            println!("ai> {PLACEHOLDER_TEXT}");
        }
        self.pending = pending;
    }

    pub fn status(&self, status: &StatusLine) {
        println!("{}", format_status(status));
    }

    pub fn note(&self, text: &str) {
        println!("{text}");
    }

    pub fn prompt(&self) {
        print!("> ");
        let _ = io::stdout().flush();
    }
}
