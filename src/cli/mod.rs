//! CLI module for Ragent.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ragent - retrieval-augmented agent
///
/// Ingest documents into a local knowledge base and ask an LLM agent
/// questions that it answers by searching that knowledge base.
#[derive(Parser, Debug)]
#[command(name = "ragent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RAGENT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest local documents into the knowledge base
    Ingest {
        /// Files to ingest (PDF, HTML, Markdown, text)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Maximum number of files processed at once
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
    },

    /// Fetch a web page and ingest its text
    IngestUrl {
        /// Page URL (http or https)
        url: String,
    },

    /// Delete an ingested document and all its chunks
    Delete {
        /// Document ID printed by `ingest`
        document_id: String,
    },

    /// Search the knowledge base
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Ask the agent a question
    Ask {
        /// The message to send
        message: String,

        /// LLM provider (gemini, ollama, mock)
        #[arg(short, long)]
        provider: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// System instruction for this request
        #[arg(short, long)]
        system: Option<String>,
    },

    /// List ingested documents
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file if none exists
    Init,
}
