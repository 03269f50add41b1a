use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;

use docent_cli::logging::init_logging;
use docent_lib::context::DocentContext;
use docent_lib::db::driver::DatabaseDriver;
use docent_lib::output::{ConsoleIO, StdIO};
use docent_lib::providers::DefaultProviders;
use docent_lib::runtime::Runtime;
use docent_lib::settings::Settings;

fn build_runtime() -> anyhow::Result<Runtime> {
    let settings = Settings::from_env();
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    let mut context = DocentContext::new(cwd);
    if let Some(dir) = &settings.docs_dir {
        context = context.with_docs_dir(dir);
    }
    if let Some(dir) = &settings.model_dir {
        context = context.with_model_cache_dir(dir);
    }
    let db = DatabaseDriver::file(context.db_path());

    Ok(Runtime {
        context,
        db,
        settings,
        providers: Box::new(DefaultProviders),
    })
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let mut io = StdIO::new();

    let result = build_runtime().and_then(|runtime| {
        // Settings load `.env` first, so it can set the log filter too.
        init_logging();
        docent_cli::try_run(&arg_refs, &runtime, &mut io)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            let _ = writeln!(io.stderr(), "Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
