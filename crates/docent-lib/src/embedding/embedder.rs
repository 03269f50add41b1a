use std::fs;
use std::path::Path;

use anyhow::Context;
use fastembed::{
    InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles, UserDefinedEmbeddingModel,
};
use tracing::debug;

use crate::config::EMBEDDING_DIMENSION;
use crate::embedding::{EmbeddingProvider, check_batch};
use crate::error::{RagError, Result};

/// Subdirectory name under `model_cache_dir` for all-MiniLM-L6-v2 files.
pub const MODEL_SUBDIR: &str = "all-MiniLM-L6-v2";

/// Files the embedder expects inside [`MODEL_SUBDIR`].
pub const MODEL_FILES: &[&str] = &[
    "model.onnx",
    "tokenizer.json",
    "config.json",
    "special_tokens_map.json",
    "tokenizer_config.json",
];

/// Wrapper around fastembed's `TextEmbedding` model.
/// Uses all-MiniLM-L6-v2 loaded from disk.
pub struct Embedder {
    model: TextEmbedding,
}

impl Embedder {
    /// Create a new embedder by loading all-MiniLM-L6-v2 from disk.
    ///
    /// If the model files are not found, returns an error instructing the user
    /// to run `docent model download`.
    pub fn new(model_cache_dir: &Path) -> anyhow::Result<Self> {
        let base = model_cache_dir.join(MODEL_SUBDIR);

        let onnx_bytes = fs::read(base.join("model.onnx")).with_context(|| {
            format!(
                "Model not found at {}. Run 'docent model download' first.",
                base.display()
            )
        })?;

        let tokenizer_files = TokenizerFiles {
            tokenizer_file: fs::read(base.join("tokenizer.json"))
                .context("Missing tokenizer.json")?,
            config_file: fs::read(base.join("config.json")).context("Missing config.json")?,
            special_tokens_map_file: fs::read(base.join("special_tokens_map.json"))
                .context("Missing special_tokens_map.json")?,
            tokenizer_config_file: fs::read(base.join("tokenizer_config.json"))
                .context("Missing tokenizer_config.json")?,
        };

        // Sentence-transformers MiniLM is trained with mean pooling.
        let user_model =
            UserDefinedEmbeddingModel::new(onnx_bytes, tokenizer_files).with_pooling(Pooling::Mean);

        let model =
            TextEmbedding::try_new_from_user_defined(user_model, InitOptionsUserDefined::default())
                .context("Failed to initialize all-MiniLM-L6-v2 model")?;

        Ok(Self { model })
    }

    /// Whether every model file is present under `model_cache_dir`.
    pub fn is_downloaded(model_cache_dir: &Path) -> bool {
        let base = model_cache_dir.join(MODEL_SUBDIR);
        MODEL_FILES.iter().all(|name| base.join(name).exists())
    }
}

impl EmbeddingProvider for Embedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(batch_size = texts.len(), "Embedding batch");
        let owned: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();
        let embeddings = self
            .model
            .embed(owned, None)
            .map_err(|e| RagError::Embedding(format!("{e:#}")))?;
        check_batch(&embeddings, texts.len(), EMBEDDING_DIMENSION)?;
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use docent_test_util::model::model_dir;

    use super::*;

    #[test]
    fn missing_model_points_at_download_command() {
        let tmp = tempfile::tempdir().unwrap();
        let Err(err) = Embedder::new(tmp.path()) else {
            panic!("expected an error for an empty model dir");
        };
        assert!(err.to_string().contains("docent model download"));
        assert!(!Embedder::is_downloaded(tmp.path()));
    }

    #[test]
    #[ignore = "requires `docent model download`"]
    fn embed_documents_returns_384_dimensions() {
        let mut embedder = Embedder::new(&model_dir()).unwrap();
        let embeddings = embedder
            .embed_documents(&["hello world", "how are you"])
            .unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 384);
        assert_eq!(embeddings[1].len(), 384);
    }

    #[test]
    #[ignore = "requires `docent model download`"]
    fn embed_query_matches_document_embedding() {
        let mut embedder = Embedder::new(&model_dir()).unwrap();
        let doc = embedder.embed_documents(&["vector search"]).unwrap();
        let query = embedder.embed_query("vector search").unwrap();
        assert_eq!(doc[0], query);
    }
}
