use rusqlite::Connection;
use tracing::{debug, info};

use crate::db::queries;
use crate::error::{RagError, Result};
use crate::vector_store::{IndexedRecord, QueryHit, VectorStore};

/// [`VectorStore`] backed by a single SQLite connection.
///
/// Vectors are stored as `f32` blobs and ranked with the `vector_distance_cos`
/// SQL function registered by [`crate::db::connection::prepare`].
pub struct SqliteVectorStore {
    conn: Connection,
}

impl SqliteVectorStore {
    /// Wrap a connection obtained from [`crate::db::driver::DatabaseDriver::open`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn dimension_of(&self, collection: &str) -> Result<usize> {
        queries::get_collection_dimension(&self.conn, collection)?
            .ok_or_else(|| RagError::MissingCollection(collection.to_string()))
    }
}

impl VectorStore for SqliteVectorStore {
    fn get_or_create_collection(&mut self, name: &str, dimension: usize) -> Result<()> {
        match queries::get_collection_dimension(&self.conn, name)? {
            Some(existing) if existing == dimension => Ok(()),
            Some(existing) => Err(RagError::DimensionMismatch {
                expected: existing,
                actual: dimension,
            }),
            None => queries::insert_collection(&self.conn, name, dimension),
        }
    }

    fn upsert(&mut self, collection: &str, records: &[IndexedRecord]) -> Result<()> {
        let dimension = self.dimension_of(collection)?;
        if let Some(bad) = records.iter().find(|r| r.vector.len() != dimension) {
            return Err(RagError::DimensionMismatch {
                expected: dimension,
                actual: bad.vector.len(),
            });
        }

        let tx = self.conn.transaction()?;
        for record in records {
            queries::upsert_record(&tx, collection, record)?;
        }
        tx.commit()?;
        info!(collection = %collection, count = records.len(), "Upserted records");
        Ok(())
    }

    fn create_index(&mut self, collection: &str) -> Result<()> {
        self.dimension_of(collection)?;
        self.conn.execute_batch("ANALYZE records;")?;
        queries::mark_indexed(&self.conn, collection)?;
        debug!(collection = %collection, "Rebuilt index");
        Ok(())
    }

    fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<QueryHit>> {
        let dimension = self.dimension_of(collection)?;
        if vector.len() != dimension {
            return Err(RagError::DimensionMismatch {
                expected: dimension,
                actual: vector.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }
        queries::search_records(&self.conn, collection, vector, k)
    }

    fn delete_collection(&mut self, name: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        queries::delete_collection(&tx, name)?;
        tx.commit()?;
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize> {
        queries::count_records(&self.conn, collection)
    }
}
