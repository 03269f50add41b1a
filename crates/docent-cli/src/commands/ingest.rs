use std::io::{BufRead, Write};
use std::path::Path;

use docent_lib::app::build_rag;
use docent_lib::output::ConsoleIO;
use docent_lib::pipeline::rag::{ExtractionPolicy, IdStrategy, IngestOptions};
use docent_lib::runtime::Runtime;

/// Run the `docent ingest` command.
pub fn run_ingest<IN, OUT, ERR>(
    dir: Option<&Path>,
    strict: bool,
    positional_ids: bool,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let folder = match dir {
        Some(dir) => runtime.context.clone().with_docs_dir(dir).docs_dir().to_path_buf(),
        None => runtime.context.docs_dir().to_path_buf(),
    };
    let options = IngestOptions {
        policy: if strict {
            ExtractionPolicy::Abort
        } else {
            ExtractionPolicy::Skip
        },
        ids: if positional_ids {
            IdStrategy::Positional
        } else {
            IdStrategy::ContentHash
        },
    };

    let mut rag = build_rag(runtime, options)?;
    let report = rag.ingest(&folder)?;

    for skipped in &report.skipped {
        writeln!(io.stderr(), "Skipped {}: {}", skipped.file, skipped.error)?;
    }

    if report.files_indexed == 0 && report.skipped.is_empty() {
        writeln!(io.stdout(), "No PDFs found in {}.", folder.display())?;
    } else {
        writeln!(
            io.stdout(),
            "Indexed {} chunks from {} PDF(s).",
            report.chunk_count,
            report.files_indexed
        )?;
    }
    Ok(())
}
