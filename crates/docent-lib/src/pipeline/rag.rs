use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::COLLECTION_NAME;
use crate::embedding::{EmbeddingProvider, check_batch};
use crate::error::{RagError, Result};
use crate::extract::{TextExtractor, file_label};
use crate::pipeline::chunker::{Chunk, chunk_text, default_splitter};
use crate::vector_store::{IndexedRecord, RecordPayload, VectorStore};

/// What to do when a PDF cannot be read during ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionPolicy {
    /// Log the failure, record it in [`IngestReport::skipped`] and continue.
    #[default]
    Skip,
    /// Fail the whole ingest.
    Abort,
}

/// How record ids are assigned to chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// SHA-256 of (source, chunk index, text). Re-ingesting the same documents
    /// overwrites their records instead of duplicating them.
    #[default]
    ContentHash,
    /// `doc_{i}` in batch order. Re-ingesting a different folder overwrites
    /// records by position.
    Positional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    pub policy: ExtractionPolicy,
    pub ids: IdStrategy,
}

/// A PDF that was left out of an ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPdf {
    pub file: String,
    pub error: String,
}

/// Summary of one [`RagSystem::ingest`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub chunk_count: usize,
    pub files_indexed: usize,
    pub skipped: Vec<SkippedPdf>,
}

/// One similarity search match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
    /// `1 - cosine distance`, clamped to `[0, 1]`.
    pub similarity_score: f64,
}

/// The retrieval pipeline: PDFs in, ranked chunks out.
pub struct RagSystem {
    embedder: Box<dyn EmbeddingProvider>,
    store: Box<dyn VectorStore>,
    extractor: Box<dyn TextExtractor>,
    options: IngestOptions,
    collection: String,
}

impl RagSystem {
    /// Build the pipeline, creating the document collection if needed.
    pub fn new(
        embedder: Box<dyn EmbeddingProvider>,
        mut store: Box<dyn VectorStore>,
        extractor: Box<dyn TextExtractor>,
    ) -> Result<Self> {
        store.get_or_create_collection(COLLECTION_NAME, embedder.dimension())?;
        Ok(Self {
            embedder,
            store,
            extractor,
            options: IngestOptions::default(),
            collection: COLLECTION_NAME.to_string(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: IngestOptions) -> Self {
        self.options = options;
        self
    }

    /// Index every PDF in `folder`.
    ///
    /// The folder is created when absent. All chunks are embedded in a single
    /// batch, upserted, and the index is rebuilt. With no chunks nothing is
    /// written.
    pub fn ingest(&mut self, folder: &Path) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        if !folder.exists() {
            fs::create_dir_all(folder)?;
            info!(folder = %folder.display(), "Created empty documents folder");
            return Ok(report);
        }

        let splitter = default_splitter().map_err(|e| RagError::Chunking(e.to_string()))?;
        let mut chunks: Vec<Chunk> = Vec::new();

        for path in Self::list_pdfs(folder)? {
            let label = file_label(&path);
            let text = match self.extractor.extract(&path) {
                Ok(text) => text,
                Err(e) if self.options.policy == ExtractionPolicy::Skip => {
                    warn!(file = %label, error = %e, "Skipping unreadable PDF");
                    report.skipped.push(SkippedPdf {
                        file: label,
                        error: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let file_chunks = chunk_text(&splitter, &text, &label);
            debug!(file = %label, chunks = file_chunks.len(), "Chunked document");
            report.files_indexed += 1;
            chunks.extend(file_chunks);
        }

        if chunks.is_empty() {
            info!(folder = %folder.display(), "No chunks to index");
            return Ok(report);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_documents(&texts)?;
        check_batch(&vectors, chunks.len(), self.embedder.dimension())?;

        let records: Vec<IndexedRecord> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (chunk, vector))| IndexedRecord {
                id: self.record_id(i, &chunk),
                vector,
                payload: RecordPayload {
                    text: chunk.text,
                    source: chunk.source,
                    chunk_index: chunk.chunk_index,
                    total_chunks: chunk.total_chunks,
                },
            })
            .collect();

        self.store.upsert(&self.collection, &records)?;
        self.store.create_index(&self.collection)?;

        report.chunk_count = records.len();
        info!(
            chunks = report.chunk_count,
            files = report.files_indexed,
            skipped = report.skipped.len(),
            "Ingest complete"
        );
        Ok(report)
    }

    /// The `k` chunks most similar to `query`, best first.
    pub fn search(&mut self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let vector = self.embedder.embed_query(query)?;
        let hits = self.store.query(&self.collection, &vector, k)?;
        debug!(query_len = query.len(), k, hits = hits.len(), "Searched documents");

        Ok(hits
            .into_iter()
            .map(|hit| SearchResult {
                text: hit.payload.text,
                source: hit.payload.source,
                chunk_index: hit.payload.chunk_index,
                similarity_score: (1.0 - hit.distance).clamp(0.0, 1.0),
            })
            .collect())
    }

    /// Drop every indexed record, leaving an empty collection of the same dimension.
    pub fn clear(&mut self) -> Result<()> {
        self.store.delete_collection(&self.collection)?;
        self.store
            .get_or_create_collection(&self.collection, self.embedder.dimension())?;
        info!(collection = %self.collection, "Cleared index");
        Ok(())
    }

    /// PDF files directly inside `folder`, sorted by file name.
    ///
    /// A missing folder yields an empty list.
    pub fn list_pdfs(folder: &Path) -> Result<Vec<PathBuf>> {
        if !folder.is_dir() {
            return Ok(Vec::new());
        }
        let mut pdfs: Vec<PathBuf> = fs::read_dir(folder)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            })
            .collect();
        pdfs.sort_by_key(|path| file_label(path));
        Ok(pdfs)
    }

    /// Number of records currently in the index.
    pub fn indexed_count(&self) -> Result<usize> {
        self.store.count(&self.collection)
    }

    fn record_id(&self, position: usize, chunk: &Chunk) -> String {
        match self.options.ids {
            IdStrategy::Positional => format!("doc_{position}"),
            IdStrategy::ContentHash => {
                let mut hasher = Sha256::new();
                hasher.update(chunk.source.as_bytes());
                hasher.update([0]);
                hasher.update(chunk.chunk_index.to_le_bytes());
                hasher.update([0]);
                hasher.update(chunk.text.as_bytes());
                format!("{:x}", hasher.finalize())
            }
        }
    }
}
