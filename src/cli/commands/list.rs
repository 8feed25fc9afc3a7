//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::worker::Worker;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let worker = Worker::new(settings)?;

    match worker.list_documents().await {
        Ok(documents) => {
            if documents.is_empty() {
                Output::info("No documents ingested yet. Use 'ragent ingest <file>' to add content.");
            } else {
                Output::header(&format!("Ingested Documents ({})", documents.len()));
                println!();

                for doc in &documents {
                    Output::document_info(
                        &doc.filename,
                        &doc.document_id,
                        doc.chunk_count,
                        &doc.indexed_at,
                    );
                }

                let total_chunks: usize = documents.iter().map(|d| d.chunk_count).sum();
                println!();
                Output::kv("Total documents", &documents.len().to_string());
                Output::kv("Total chunks", &total_chunks.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list documents: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
