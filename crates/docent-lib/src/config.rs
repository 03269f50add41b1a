/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIMENSION: usize = 384;

/// Target chunk size in characters.
pub const CHUNK_SIZE: usize = 1000;

/// Number of characters shared between adjacent chunks of the same document.
pub const CHUNK_OVERLAP: usize = 200;

/// Default number of top-k results for vector similarity search.
pub const DEFAULT_TOP_K: usize = 4;

/// Name of the vector store collection holding document chunks.
pub const COLLECTION_NAME: &str = "documents";

/// Folder scanned for PDFs when nothing else is configured.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Maximum number of Thinking steps (model calls) per question.
pub const MAX_ITERATIONS: usize = 5;

/// Maximum number of results requested from the web search provider.
pub const WEB_SEARCH_MAX_RESULTS: usize = 3;

/// Sampling temperature passed to the reasoning model.
pub const MODEL_TEMPERATURE: f32 = 0.7;

/// Gemini model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
