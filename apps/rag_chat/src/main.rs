use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    ChatController, FilePayload, HttpBackend, InMemoryTranscript, IngestionOutcome, SourceSelection,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod render;

use render::TerminalView;

/// Ask questions about a document or web page through a RAG backend.
#[derive(Parser, Debug)]
struct Args {
    /// Backend base URL; overrides the settings file and environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file (defaults to ./rag_chat.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Document to ingest before starting.
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Web page to ingest before starting.
    #[arg(long)]
    url: Option<String>,
    /// Ask a single question and exit instead of opening the prompt.
    #[arg(long)]
    question: Option<String>,
}

pub(crate) async fn load_file(path: &Path) -> Result<FilePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let mut file = FilePayload::new(filename, bytes);
    if let Some(mime_type) = mime_guess::from_path(path).first_raw() {
        file = file.with_mime_type(mime_type);
    }
    Ok(file)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings =
        config::load_settings(args.config.as_deref())?.with_server_url(args.server_url.clone());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let backend = HttpBackend::new(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    info!(server_url = %backend.base_url(), "rag_chat: starting");

    let transcript = Arc::new(InMemoryTranscript::new());
    let controller = Arc::new(ChatController::new_with_dependencies(
        Arc::new(backend),
        transcript.clone(),
    ));
    let mut view = TerminalView::new(transcript);

    let selection = match (&args.file, &args.url) {
        (Some(path), _) => Some(SourceSelection::file(load_file(path).await?)),
        (None, Some(url)) => Some(SourceSelection::url(url.clone())),
        (None, None) => None,
    };
    if let Some(selection) = selection {
        let outcome = controller.submit(selection).await;
        if let Some(status) = controller.status().await {
            view.status(&status);
        }
        if let IngestionOutcome::Rejected(err) = outcome {
            bail!("ingestion failed: {err}");
        }
    }

    if let Some(question) = args.question {
        if !controller.qa_enabled().await {
            bail!("--question needs a source; pass --file or --url");
        }
        controller.ask(&question).await;
        view.flush().await;
        return Ok(());
    }

    prompt::run(controller, view).await
}
