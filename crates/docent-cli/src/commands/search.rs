use std::io::{BufRead, Write};

use docent_lib::app::build_rag;
use docent_lib::output::ConsoleIO;
use docent_lib::pipeline::rag::IngestOptions;
use docent_lib::runtime::Runtime;

/// Run the `docent search` command.
pub fn run_search<IN, OUT, ERR>(
    text: &str,
    k: usize,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let mut rag = build_rag(runtime, IngestOptions::default())?;
    let results = rag.search(text, k)?;

    if results.is_empty() {
        writeln!(io.stdout(), "No matching documents found.")?;
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        writeln!(
            io.stdout(),
            "[{}] {} (chunk {}, similarity {:.3})\n{}\n",
            i + 1,
            result.source,
            result.chunk_index,
            result.similarity_score,
            result.text
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use docent_lib::output::BufferedIO;

    use crate::test_util::{runtime_in_memory, write_docs};

    #[test]
    fn try_run_search_with_results() {
        let (_tmp, runtime) = runtime_in_memory("cli_search_results");
        let seed_text = "Vector databases store embeddings";
        write_docs(
            runtime.context.docs_dir(),
            &[("vectors.pdf", seed_text), ("soup.pdf", "Tomato soup recipe")],
        );
        let mut io = BufferedIO::new();
        crate::try_run(&["docent", "ingest"], &runtime, &mut io).unwrap();

        let mut io = BufferedIO::new();
        crate::try_run(&["docent", "search", seed_text, "-k", "1"], &runtime, &mut io).unwrap();

        assert_eq!(
            io.stdout_to_string(),
            format!("[1] vectors.pdf (chunk 0, similarity 1.000)\n{seed_text}\n\n")
        );
        assert_eq!(io.stderr_to_string(), "");
    }

    #[test]
    fn try_run_search_no_results() {
        let (_tmp, runtime) = runtime_in_memory("cli_search_empty");
        let mut io = BufferedIO::new();

        crate::try_run(&["docent", "search", "anything at all"], &runtime, &mut io).unwrap();

        assert_eq!(io.stdout_to_string(), "No matching documents found.\n");
        assert_eq!(io.stderr_to_string(), "");
    }
}
