use std::path::PathBuf;

/// Return the model cache directory for tests.
///
/// Checks `DOCENT_MODEL_DIR` first, falling back to `~/.docent/models/`.
pub fn model_dir() -> PathBuf {
    std::env::var("DOCENT_MODEL_DIR").map_or_else(
        |_| {
            dirs::home_dir()
                .expect("home dir")
                .join(".docent")
                .join("models")
        },
        PathBuf::from,
    )
}
