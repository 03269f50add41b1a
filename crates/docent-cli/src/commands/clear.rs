use std::io::{BufRead, Write};

use docent_lib::app::build_rag;
use docent_lib::output::ConsoleIO;
use docent_lib::pipeline::rag::IngestOptions;
use docent_lib::runtime::Runtime;

/// Run the `docent clear` command. Asks for confirmation unless `yes` is set.
pub fn run_clear<IN, OUT, ERR>(
    yes: bool,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let mut rag = build_rag(runtime, IngestOptions::default())?;

    if !yes {
        let count = rag.indexed_count()?;
        write!(
            io.stderr(),
            "This will delete {count} indexed chunks. Continue? [y/N] "
        )?;
        io.stderr().flush()?;
        let answer = io.read_line()?.unwrap_or_default();
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            writeln!(io.stdout(), "Aborted.")?;
            return Ok(());
        }
    }

    rag.clear()?;
    writeln!(io.stdout(), "Index cleared.")?;
    Ok(())
}
