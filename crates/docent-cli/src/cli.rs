use std::path::PathBuf;

use clap::{Parser, Subcommand};

use docent_lib::config::DEFAULT_TOP_K;

#[derive(Parser, Debug)]
#[command(
    name = "docent",
    about = "Ask questions about your PDF documents, with web search as a fallback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index every PDF in the documents folder.
    Ingest {
        /// Folder to scan instead of the configured documents folder.
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Fail on the first unreadable PDF instead of skipping it.
        #[arg(long)]
        strict: bool,
        /// Use `doc_{i}` record ids instead of content hashes.
        #[arg(long)]
        positional_ids: bool,
    },

    /// Show the indexed chunks most similar to a query.
    Search {
        /// Query text.
        text: String,
        /// Number of results to return.
        #[arg(short, default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },

    /// Delete every indexed chunk.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Answer one question with the reasoning agent.
    Ask {
        question: String,
        /// Print the full response (answer, outcome and tool trace) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive chat over stdin.
    Chat,

    /// Show the documents folder, index size and available tools.
    Status,

    /// Manage the embedding model.
    Model {
        #[command(subcommand)]
        model_command: ModelCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelCommand {
    /// Download the embedding model files from Hugging Face.
    Download {
        /// Force re-download even if files already exist.
        #[arg(long)]
        force: bool,
    },
}
