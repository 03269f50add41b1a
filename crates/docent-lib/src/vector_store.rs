use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One row of the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: RecordPayload,
}

/// A nearest-neighbour match: `(id, distance, payload)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub distance: f64,
    pub payload: RecordPayload,
}

/// Persistent `(id, vector, payload)` storage with similarity search.
pub trait VectorStore {
    /// Ensure a collection exists with the given dimension.
    ///
    /// Idempotent for a matching dimension. An existing collection with a
    /// different dimension is a [`RagError::DimensionMismatch`](crate::error::RagError).
    fn get_or_create_collection(&mut self, name: &str, dimension: usize) -> Result<()>;

    /// Insert or replace records by id. Every vector must match the collection dimension.
    fn upsert(&mut self, collection: &str, records: &[IndexedRecord]) -> Result<()>;

    /// Rebuild whatever lookup structures the backend keeps for queries.
    fn create_index(&mut self, collection: &str) -> Result<()>;

    /// The `k` records closest to `vector`, nearest first.
    fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<QueryHit>>;

    /// Drop a collection and all of its records. Missing collections are ignored.
    fn delete_collection(&mut self, name: &str) -> Result<()>;

    /// Number of records in a collection (0 when it does not exist).
    fn count(&self, collection: &str) -> Result<usize>;
}
