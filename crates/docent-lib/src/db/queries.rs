#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::db::connection::DISTANCE_FN;
use crate::error::Result;
use crate::vector_store::{IndexedRecord, QueryHit, RecordPayload};

/// Serialize a vector as little-endian `f32` bytes.
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Inverse of [`encode_vector`]. Trailing bytes that do not form a full `f32` are ignored.
pub fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Dimension of a collection, or `None` if it does not exist.
pub fn get_collection_dimension(conn: &Connection, name: &str) -> Result<Option<usize>> {
    let dimension = conn
        .query_row(
            "SELECT dimension FROM collections WHERE name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(dimension.map(|d| d as usize))
}

/// Register a new collection.
pub fn insert_collection(conn: &Connection, name: &str, dimension: usize) -> Result<()> {
    debug!(collection = %name, dimension, "Creating collection");
    conn.execute(
        "INSERT INTO collections (name, dimension) VALUES (?1, ?2)",
        params![name, dimension as i64],
    )?;
    Ok(())
}

/// Delete a collection and its records. Returns the number of records removed.
pub fn delete_collection(conn: &Connection, name: &str) -> Result<usize> {
    let removed = conn.execute("DELETE FROM records WHERE collection = ?1", params![name])?;
    conn.execute("DELETE FROM collections WHERE name = ?1", params![name])?;
    debug!(collection = %name, removed, "Deleted collection");
    Ok(removed)
}

/// Insert a record, replacing any existing record with the same id.
pub fn upsert_record(conn: &Connection, collection: &str, record: &IndexedRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO records (collection, id, embedding, text, source, chunk_index, total_chunks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(collection, id) DO UPDATE SET
           embedding = excluded.embedding,
           text = excluded.text,
           source = excluded.source,
           chunk_index = excluded.chunk_index,
           total_chunks = excluded.total_chunks",
        params![
            collection,
            record.id,
            encode_vector(&record.vector),
            record.payload.text,
            record.payload.source,
            record.payload.chunk_index as i64,
            record.payload.total_chunks as i64,
        ],
    )?;
    Ok(())
}

/// Number of records stored in a collection.
pub fn count_records(conn: &Connection, collection: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM records WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Stamp the collection's `indexed_at` with the current time.
pub fn mark_indexed(conn: &Connection, collection: &str) -> Result<()> {
    conn.execute(
        "UPDATE collections SET indexed_at = datetime('now') WHERE name = ?1",
        params![collection],
    )?;
    Ok(())
}

/// When the collection's index was last rebuilt, if ever.
pub fn get_indexed_at(conn: &Connection, collection: &str) -> Result<Option<String>> {
    let indexed_at = conn
        .query_row(
            "SELECT indexed_at FROM collections WHERE name = ?1",
            params![collection],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;
    Ok(indexed_at.flatten())
}

/// The `k` records nearest to `query` by cosine distance. Ties resolve by insertion order.
pub fn search_records(
    conn: &Connection,
    collection: &str,
    query: &[f32],
    k: usize,
) -> Result<Vec<QueryHit>> {
    let sql = format!(
        "SELECT id, text, source, chunk_index, total_chunks, {DISTANCE_FN}(embedding, ?2) AS distance
         FROM records
         WHERE collection = ?1
         ORDER BY distance ASC, rowid ASC
         LIMIT ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    let hits = stmt
        .query_map(
            params![collection, encode_vector(query), k as i64],
            |row| {
                Ok(QueryHit {
                    id: row.get(0)?,
                    payload: RecordPayload {
                        text: row.get(1)?,
                        source: row.get(2)?,
                        chunk_index: row.get::<_, i64>(3)? as usize,
                        total_chunks: row.get::<_, i64>(4)? as usize,
                    },
                    distance: row.get(5)?,
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(collection = %collection, k, hits = hits.len(), "Searched records");
    Ok(hits)
}
