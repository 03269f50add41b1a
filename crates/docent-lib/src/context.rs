use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DOCS_DIR;

/// Directory (relative to the project root) holding docent's own state.
const STATE_DIR: &str = ".docent";

/// File name of the SQLite index inside [`STATE_DIR`].
const DB_FILE_NAME: &str = "docent.db";

/// Filesystem layout for one docent project.
///
/// All paths derive from the project root unless explicitly overridden, so a
/// test can point a context at a temp directory and get an isolated layout.
#[derive(Debug, Clone)]
pub struct DocentContext {
    project_root: PathBuf,
    docs_dir: PathBuf,
    model_cache_dir: PathBuf,
}

impl DocentContext {
    pub fn new(project_root: PathBuf) -> Self {
        let docs_dir = project_root.join(DEFAULT_DOCS_DIR);
        let model_cache_dir = dirs::home_dir()
            .unwrap_or_else(|| project_root.clone())
            .join(STATE_DIR)
            .join("models");
        Self {
            project_root,
            docs_dir,
            model_cache_dir,
        }
    }

    /// Override the PDF folder. Relative paths resolve against the project root.
    #[must_use]
    pub fn with_docs_dir(mut self, docs_dir: &Path) -> Self {
        self.docs_dir = self.resolve(docs_dir);
        self
    }

    #[must_use]
    pub fn with_model_cache_dir(mut self, model_cache_dir: &Path) -> Self {
        self.model_cache_dir = self.resolve(model_cache_dir);
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub fn model_cache_dir(&self) -> &Path {
        &self.model_cache_dir
    }

    pub fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    pub fn db_path(&self) -> PathBuf {
        self.state_dir().join(DB_FILE_NAME)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
