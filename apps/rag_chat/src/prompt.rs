use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use client_core::{ChatController, ClientEvent, SourceSelection};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::warn;

use crate::{load_file, render::TerminalView};

pub const HELP: &str = "\
commands:
  /file <path>   ingest a local document
  /url <url>     ingest a web page
  /status        show the ingestion status and active source
  /help          show this help
  /quit          exit
anything else is asked as a question about the active source";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    File(PathBuf),
    Url(String),
    Status,
    Help,
    Quit,
    Ask(String),
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "file" if !arg.is_empty() => Command::File(PathBuf::from(arg)),
        "url" => Command::Url(arg.to_string()),
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        _ => Command::Help,
    }
}

/// Reads commands until EOF or `/quit`. Submissions and questions run as
/// their own tasks so a slow backend never blocks the prompt.
pub async fn run(controller: Arc<ChatController>, mut view: TerminalView) -> anyhow::Result<()> {
    let mut events = controller.subscribe_events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    view.note(HELP);
    view.prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Empty => {}
                    Command::Help => view.note(HELP),
                    Command::Status => {
                        match controller.status().await {
                            Some(status) => view.status(&status),
                            None => view.note("no source submitted yet"),
                        }
                        if let Some(filename) = controller.active_filename().await {
                            view.note(&format!("active source: {filename}"));
                        }
                    }
                    Command::File(path) => match load_file(&path).await {
                        Ok(file) => spawn_submit(&controller, SourceSelection::file(file)),
                        Err(err) => view.note(&format!("Error: {err:#}")),
                    },
                    Command::Url(url) => spawn_submit(&controller, SourceSelection::url(url)),
                    Command::Ask(question) => {
                        if controller.qa_enabled().await {
                            let controller = Arc::clone(&controller);
                            tokio::spawn(async move {
                                controller.ask(&question).await;
                            });
                        } else {
                            view.note("ingest a source with /file or /url before asking");
                        }
                    }
                }
                view.prompt();
            }
            event = events.recv() => match event {
                Ok(ClientEvent::StatusChanged(status)) => view.status(&status),
                Ok(ClientEvent::SourceActivated { filename }) => {
                    view.note(&format!("ready for questions about: {filename}"));
                }
                Ok(ClientEvent::QuestionAccepted) => {}
                Ok(ClientEvent::TranscriptUpdated) => view.flush().await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "prompt: event receiver lagged");
                    view.flush().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    Ok(())
}

fn spawn_submit(controller: &Arc<ChatController>, selection: SourceSelection) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller.submit(selection).await;
    });
}
