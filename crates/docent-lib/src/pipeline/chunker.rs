use text_splitter::{Characters, ChunkConfig, ChunkConfigError, TextSplitter};

use crate::config::{CHUNK_OVERLAP, CHUNK_SIZE};

/// A contiguous slice of one document's text, ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// File name of the document this chunk came from.
    pub source: String,
    /// Sequential chunk index within the document (0-based).
    pub chunk_index: usize,
    pub total_chunks: usize,
    /// Byte offset of `text` within the document.
    pub offset: usize,
}

/// Character-based splitter with the default size and overlap.
///
/// Splits at the coarsest boundary that fits (paragraph, line, sentence, word)
/// and only falls back to characters for runs with no breaks. Whitespace is
/// kept so consecutive chunks tile the source text.
pub fn default_splitter() -> Result<TextSplitter<Characters>, ChunkConfigError> {
    let config = ChunkConfig::new(CHUNK_SIZE)
        .with_overlap(CHUNK_OVERLAP)?
        .with_trim(false);
    Ok(TextSplitter::new(config))
}

/// Split a document's text into overlapping chunks tagged with `source`.
///
/// Whitespace-only segments (e.g. blank pages) are dropped.
pub fn chunk_text(
    splitter: &TextSplitter<Characters>,
    text: &str,
    source: &str,
) -> Vec<Chunk> {
    let spans: Vec<(usize, &str)> = splitter
        .chunk_indices(text)
        .filter(|(_, s)| !s.trim().is_empty())
        .collect();
    let total_chunks = spans.len();

    spans
        .into_iter()
        .enumerate()
        .map(|(chunk_index, (offset, s))| Chunk {
            text: s.to_string(),
            source: source.to_string(),
            chunk_index,
            total_chunks,
            offset,
        })
        .collect()
}
