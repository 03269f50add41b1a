use std::io::{BufRead, Write};

use docent_lib::app::Assistant;
use docent_lib::output::ConsoleIO;
use docent_lib::runtime::Runtime;

/// Run the `docent ask` command.
///
/// The answer goes to stdout and the tool trace to stderr, unless `json` is
/// set, in which case the whole response is printed as JSON.
pub fn run_ask<IN, OUT, ERR>(
    question: &str,
    json: bool,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let mut assistant = Assistant::build(runtime)?;
    let response = assistant.ask(question);

    if json {
        writeln!(io.stdout(), "{}", serde_json::to_string_pretty(&response)?)?;
        return Ok(());
    }

    for step in &response.trace {
        writeln!(io.stderr(), "[{}] {}", step.tool_name, step.input)?;
    }
    writeln!(io.stdout(), "{}", response.output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use docent_lib::output::BufferedIO;
    use docent_lib::test_util::FakeProviders;

    use crate::test_util::{runtime_in_memory, runtime_with, write_docs};

    #[test]
    fn try_run_ask_prints_answer_and_trace() {
        let providers = FakeProviders::default().with_replies([
            "Action: search_documents\nAction Input: borrow checker",
            "Final Answer: It enforces ownership.",
        ]);
        let (_tmp, runtime) = runtime_with("cli_ask_answer", providers);
        write_docs(
            runtime.context.docs_dir(),
            &[("rust.pdf", "The borrow checker enforces ownership.")],
        );
        crate::try_run(&["docent", "ingest"], &runtime, &mut BufferedIO::new()).unwrap();
        let mut io = BufferedIO::new();

        crate::try_run(
            &["docent", "ask", "What does the borrow checker do?"],
            &runtime,
            &mut io,
        )
        .unwrap();

        assert_eq!(io.stdout_to_string(), "It enforces ownership.\n");
        assert_eq!(io.stderr_to_string(), "[search_documents] borrow checker\n");
    }

    #[test]
    fn try_run_ask_json() {
        let providers = FakeProviders::default().with_replies(["Final Answer: hi"]);
        let (_tmp, runtime) = runtime_with("cli_ask_json", providers);
        let mut io = BufferedIO::new();

        crate::try_run(&["docent", "ask", "hello", "--json"], &runtime, &mut io).unwrap();

        assert_eq!(
            io.stdout_to_string(),
            "{\n  \"success\": true,\n  \"output\": \"hi\",\n  \"trace\": [],\n  \"outcome\": \"done\"\n}\n"
        );
    }

    #[test]
    fn try_run_ask_reports_abort() {
        let providers = FakeProviders::default().with_replies(["not the format"; 5]);
        let (_tmp, runtime) = runtime_with("cli_ask_abort", providers);
        let mut io = BufferedIO::new();

        crate::try_run(&["docent", "ask", "hello"], &runtime, &mut io).unwrap();

        assert_eq!(
            io.stdout_to_string(),
            "Agent stopped after 5 iterations without a final answer.\n"
        );
        assert_eq!(io.stderr_to_string().lines().count(), 5);
    }

    #[test]
    fn try_run_ask_without_model_key() {
        let (_tmp, runtime) = runtime_in_memory("cli_ask_no_key");
        let mut io = BufferedIO::new();

        let result = crate::try_run(&["docent", "ask", "hello"], &runtime, &mut io);

        assert_eq!(result.unwrap_err().to_string(), "GOOGLE_API_KEY is not set");
        assert_eq!(io.stdout_to_string(), "");
    }
}
