use thiserror::Error;

/// Errors raised by the retrieval pipeline and its storage layer.
#[derive(Debug, Error)]
pub enum RagError {
    /// A PDF could not be read or decoded.
    #[error("failed to extract text from {file}: {message}")]
    Extraction { file: String, message: String },

    /// The chunk size and overlap settings are inconsistent.
    #[error("invalid chunk configuration: {0}")]
    Chunking(String),

    /// The embedding provider failed or returned malformed vectors.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The vector store backend failed.
    #[error("vector store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A vector's length does not match the collection dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The named collection does not exist.
    #[error("collection '{0}' does not exist")]
    MissingCollection(String),

    /// Schema migrations could not be applied.
    #[error("failed to apply migrations: {0}")]
    Migration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;

/// A model reply the reasoning loop could not act on.
///
/// Never escapes the loop: the message is fed back to the model as the
/// observation for that step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolDispatchError {
    #[error("{name} is not a valid tool, try one of [{available}].")]
    UnknownTool { name: String, available: String },

    #[error("Invalid Format: {0}")]
    MalformedOutput(String),
}
