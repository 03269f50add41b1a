pub mod cli;
pub mod commands;
pub mod logging;

#[cfg(test)]
pub mod test_util;

use std::io::{BufRead, Write};

use clap::Parser;
use tracing::debug;

use docent_lib::output::ConsoleIO;
use docent_lib::runtime::Runtime;

use cli::{Cli, Command, ModelCommand};

/// Main CLI entry point. Parses args and dispatches to the appropriate command.
pub fn try_run<IN, OUT, ERR>(
    args: &[&str],
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let cli = Cli::try_parse_from(args)?;
    debug!(command = ?cli.command, "Dispatching command");

    match cli.command {
        Command::Ingest {
            dir,
            strict,
            positional_ids,
        } => commands::ingest::run_ingest(dir.as_deref(), strict, positional_ids, runtime, io),
        Command::Search { text, k } => commands::search::run_search(&text, k, runtime, io),
        Command::Clear { yes } => commands::clear::run_clear(yes, runtime, io),
        Command::Ask { question, json } => commands::ask::run_ask(&question, json, runtime, io),
        Command::Chat => commands::chat::run_chat(runtime, io),
        Command::Status => commands::status::run_status(runtime, io),
        Command::Model { model_command } => match model_command {
            ModelCommand::Download { force } => {
                commands::model::run_model_download(force, runtime, io)
            }
        },
    }
}
