use std::io::{BufRead, Write};

use docent_lib::app::build_registry;
use docent_lib::config::COLLECTION_NAME;
use docent_lib::db::store::SqliteVectorStore;
use docent_lib::embedding::embedder::Embedder;
use docent_lib::extract::file_label;
use docent_lib::output::ConsoleIO;
use docent_lib::pipeline::rag::RagSystem;
use docent_lib::runtime::Runtime;
use docent_lib::vector_store::VectorStore;

/// Run the `docent status` command.
///
/// Reads the index directly so it works before the embedding model is downloaded.
pub fn run_status<IN, OUT, ERR>(
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let docs_dir = runtime.context.docs_dir();
    let pdfs = RagSystem::list_pdfs(docs_dir)?;

    writeln!(io.stdout(), "Documents folder: {}", docs_dir.display())?;
    writeln!(io.stdout(), "PDFs found: {}", pdfs.len())?;
    for pdf in &pdfs {
        writeln!(io.stdout(), "  - {}", file_label(pdf))?;
    }

    let indexed = if runtime.db.is_ready() {
        let store = SqliteVectorStore::new(runtime.db.open()?);
        store.count(COLLECTION_NAME)?
    } else {
        0
    };
    writeln!(io.stdout(), "Indexed chunks: {indexed}")?;

    let model_state = if Embedder::is_downloaded(runtime.context.model_cache_dir()) {
        "ready"
    } else {
        "missing (run `docent model download`)"
    };
    writeln!(io.stdout(), "Embedding model: {model_state}")?;

    let reasoning = match &runtime.settings.google_api_key {
        Some(_) => runtime.settings.gemini_model.clone(),
        None => "not configured (set GOOGLE_API_KEY)".to_string(),
    };
    writeln!(io.stdout(), "Reasoning model: {reasoning}")?;

    let tools = build_registry(runtime).names().join(", ");
    writeln!(io.stdout(), "Tools: {tools}")?;
    Ok(())
}
