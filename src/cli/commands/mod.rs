//! CLI command implementations.

mod ask;
mod config;
mod delete;
mod ingest;
mod list;
mod search;

pub use ask::run_ask;
pub use config::run_config;
pub use delete::run_delete;
pub use ingest::{run_ingest, run_ingest_url};
pub use list::run_list;
pub use search::run_search;
