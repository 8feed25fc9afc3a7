//! Ask command implementation.

use crate::cli::output::content_preview;
use crate::cli::Output;
use crate::config::Settings;
use crate::worker::{ChatTask, Worker};
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    message: &str,
    provider: Option<String>,
    model: Option<String>,
    system: Option<String>,
    settings: Settings,
) -> Result<()> {
    let worker = Worker::new(settings)?;

    let task = ChatTask {
        chat_id: uuid::Uuid::new_v4().to_string(),
        message: message.to_string(),
        provider,
        model,
        system_instruction: system,
    };

    let llm = &worker.settings().llm;
    Output::kv("Provider", task.provider.as_deref().unwrap_or(&llm.provider));
    Output::kv("Model", task.model.as_deref().unwrap_or(&llm.model));

    let spinner = Output::spinner("Agent working...");
    let result = worker.process_chat(&task).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => {
            println!("\n{}\n", reply.response);

            if !reply.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", reply.tool_calls.len()));
                for call in &reply.tool_calls {
                    let status = if call.failed { "failed" } else { "ok" };
                    Output::list_item(&format!(
                        "{} [{}]",
                        content_preview(&call.to_string(), 80),
                        status
                    ));
                }
                println!();
            }
        }
        Err(e) => {
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
