use std::io::{BufRead, Write};

use docent_lib::embedding::embedder::{MODEL_FILES, MODEL_SUBDIR};
use docent_lib::output::ConsoleIO;
use docent_lib::runtime::Runtime;

/// Hugging Face repository with the ONNX export of all-MiniLM-L6-v2.
const HF_REPO: &str = "Qdrant/all-MiniLM-L6-v2-onnx";

/// Run the `docent model download` command.
pub fn run_model_download<IN, OUT, ERR>(
    force: bool,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let model_dir = runtime.context.model_cache_dir().join(MODEL_SUBDIR);

    if force && model_dir.exists() {
        writeln!(io.stderr(), "Removing existing model files...")?;
        std::fs::remove_dir_all(&model_dir)?;
    }

    if !force && MODEL_FILES.iter().all(|name| model_dir.join(name).exists()) {
        writeln!(
            io.stdout(),
            "Model already downloaded at {}",
            model_dir.display()
        )?;
        return Ok(());
    }

    std::fs::create_dir_all(&model_dir)?;

    writeln!(io.stderr(), "Downloading all-MiniLM-L6-v2...")?;
    let api = hf_hub::api::sync::Api::new()?;
    let repo = api.model(HF_REPO.to_string());

    for name in MODEL_FILES {
        let dest = model_dir.join(name);
        if dest.exists() {
            writeln!(io.stderr(), "  {name} (cached)")?;
            continue;
        }
        writeln!(io.stderr(), "  {name}...")?;
        let cached = repo.get(name)?;
        std::fs::copy(&cached, &dest)?;
    }

    writeln!(io.stdout(), "Model downloaded to {}", model_dir.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use docent_lib::embedding::embedder::{MODEL_FILES, MODEL_SUBDIR};
    use docent_lib::output::BufferedIO;

    use crate::test_util::runtime_in_memory;

    #[test]
    fn try_run_model_download_skips_when_present() {
        let (_tmp, runtime) = runtime_in_memory("cli_model_present");
        let model_dir = runtime.context.model_cache_dir().join(MODEL_SUBDIR);
        std::fs::create_dir_all(&model_dir).unwrap();
        for name in MODEL_FILES {
            std::fs::write(model_dir.join(name), b"stub").unwrap();
        }
        let mut io = BufferedIO::new();

        crate::try_run(&["docent", "model", "download"], &runtime, &mut io).unwrap();

        assert_eq!(
            io.stdout_to_string(),
            format!("Model already downloaded at {}\n", model_dir.display())
        );
        assert_eq!(io.stderr_to_string(), "");
    }
}
