use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

use crate::error::{RagError, Result};

/// Define all schema migrations.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // v1: Initial schema
        M::up(
            "CREATE TABLE collections (
                name         TEXT PRIMARY KEY,
                dimension    INTEGER NOT NULL,
                indexed_at   TEXT,
                created_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE records (
                collection     TEXT NOT NULL REFERENCES collections(name),
                id             TEXT NOT NULL,
                embedding      BLOB NOT NULL,
                text           TEXT NOT NULL,
                source         TEXT NOT NULL,
                chunk_index    INTEGER NOT NULL,
                total_chunks   INTEGER NOT NULL,
                created_at     TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (collection, id)
            );

            CREATE INDEX idx_records_source
                ON records(collection, source, chunk_index);",
        ),
    ])
}

/// Apply all pending migrations to the database.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    migrations()
        .to_latest(conn)
        .map_err(|e| RagError::Migration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn migrations_are_valid() {
        migrations().validate().unwrap();
    }

    #[test]
    fn apply_migrations_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert!(table_exists(&conn, "collections"));
        assert!(table_exists(&conn, "records"));
    }

    #[test]
    fn apply_migrations_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();
    }

    #[test]
    fn record_ids_are_unique_per_collection() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute_batch(
            "INSERT INTO collections (name, dimension) VALUES ('a', 2), ('b', 2);
             INSERT INTO records (collection, id, embedding, text, source, chunk_index, total_chunks)
             VALUES ('a', 'doc_0', x'00', 't', 's.pdf', 0, 1),
                    ('b', 'doc_0', x'00', 't', 's.pdf', 0, 1);",
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO records (collection, id, embedding, text, source, chunk_index, total_chunks)
             VALUES ('a', 'doc_0', x'00', 't', 's.pdf', 0, 1)",
            [],
        );
        assert!(dup.is_err());
    }
}
