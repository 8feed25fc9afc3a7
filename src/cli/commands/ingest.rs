//! Ingest and ingest-url command implementations.

use crate::cli::Output;
use crate::config::Settings;
use crate::worker::Worker;
use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;

/// Run the ingest command.
///
/// Files are processed concurrently; a failure on one file does not stop the others.
pub async fn run_ingest(paths: &[PathBuf], concurrency: Option<usize>, settings: Settings) -> Result<()> {
    let max_concurrent = concurrency
        .unwrap_or(settings.ingestion.max_concurrent)
        .max(1);
    let worker = Worker::new(settings)?;

    let pb = Output::progress_bar(paths.len() as u64, "Ingesting");
    let worker = &worker;

    let mut stream = stream::iter(paths)
        .map(|path| async move { (path, worker.ingest_file(path).await) })
        .buffer_unordered(max_concurrent);

    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    while let Some((path, result)) = stream.next().await {
        pb.inc(1);
        match result {
            Ok(ingested) => succeeded.push(ingested),
            Err(e) => failed.push((path, e)),
        }
    }
    pb.finish_and_clear();

    for ingested in &succeeded {
        Output::success(&format!(
            "Ingested {} ({} chunks)",
            ingested.filename, ingested.chunk_count
        ));
        Output::kv("Document ID", &ingested.document_id);
    }
    for (path, e) in &failed {
        Output::error(&format!("Failed to ingest {}: {}", path.display(), e));
    }

    if !failed.is_empty() {
        anyhow::bail!("{} of {} files failed", failed.len(), paths.len());
    }

    Ok(())
}

/// Run the ingest-url command.
pub async fn run_ingest_url(url: &str, settings: Settings) -> Result<()> {
    let worker = Worker::new(settings)?;

    let spinner = Output::spinner(&format!("Fetching {}...", url));
    let result = worker.ingest_url(url).await;
    spinner.finish_and_clear();

    match result {
        Ok(ingested) => {
            Output::success(&format!(
                "Ingested {} ({} chunks)",
                ingested.filename, ingested.chunk_count
            ));
            Output::kv("Document ID", &ingested.document_id);
        }
        Err(e) => {
            Output::error(&format!("Failed to ingest {}: {}", url, e));
            return Err(e.into());
        }
    }

    Ok(())
}
