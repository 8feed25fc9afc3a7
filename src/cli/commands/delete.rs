//! Delete command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::worker::Worker;
use anyhow::Result;

/// Run the delete command.
pub async fn run_delete(document_id: &str, settings: Settings) -> Result<()> {
    let worker = Worker::new(settings)?;

    let removed = worker.delete_document(document_id).await?;
    if removed == 0 {
        Output::warning(&format!("No chunks found for document {}", document_id));
    } else {
        Output::success(&format!(
            "Deleted document {} ({} chunks)",
            document_id, removed
        ));
    }

    Ok(())
}
