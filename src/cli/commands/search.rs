//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::worker::Worker;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: Option<usize>, mut settings: Settings) -> Result<()> {
    if let Some(limit) = limit {
        settings.retrieval.top_k = limit;
    }
    let worker = Worker::new(settings)?;

    let spinner = Output::spinner("Searching...");
    let results = worker.search(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("No results found. Use 'ragent ingest <file>' to add documents.");
            } else {
                Output::success(&format!("Found {} results", results.len()));

                for result in &results {
                    Output::search_result(
                        &result.filename,
                        result.chunk_index,
                        result.score,
                        &result.text,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
