use std::path::Path;

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use tracing::debug;

use crate::db::queries::decode_vector;
use crate::db::schema::apply_migrations;
use crate::error::Result;

/// Name of the SQL function computing cosine distance between two vector blobs.
pub const DISTANCE_FN: &str = "vector_distance_cos";

/// Open (creating if needed) the database at `path`, migrated and ready for queries.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut conn = Connection::open(path)?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    })?;
    prepare(&mut conn)?;
    debug!(path = %path.display(), "Opened database");
    Ok(conn)
}

/// Apply per-connection setup: pragmas, migrations and SQL functions.
pub fn prepare(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    apply_migrations(conn)?;
    register_functions(conn)?;
    Ok(())
}

/// Register [`DISTANCE_FN`] on the connection.
///
/// Cosine distance lies in `[0, 2]`. A zero-norm vector has no direction, so
/// its distance to anything is 1.0 (orthogonal).
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        DISTANCE_FN,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let a = decode_vector(&ctx.get::<Vec<u8>>(0)?);
            let b = decode_vector(&ctx.get::<Vec<u8>>(1)?);
            if a.len() != b.len() {
                return Err(rusqlite::Error::UserFunctionError(
                    format!("vector length mismatch: {} vs {}", a.len(), b.len()).into(),
                ));
            }
            Ok(cosine_distance(&a, &b))
        },
    )?;
    Ok(())
}

/// `1 - cos(a, b)`, computed in f64.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::encode_vector;

    #[test]
    fn cosine_distance_bounds() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-9);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-9);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_is_orthogonal() {
        assert!((cosine_distance(&[0.0, 0.0], &[1.0, 2.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn open_db_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("index.db");
        open_db(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn distance_function_is_callable_from_sql() {
        let tmp = tempfile::tempdir().unwrap();
        let conn = open_db(&tmp.path().join("t.db")).unwrap();
        let distance: f64 = conn
            .query_row(
                &format!("SELECT {DISTANCE_FN}(?1, ?2)"),
                [encode_vector(&[1.0, 0.0]), encode_vector(&[0.0, 1.0])],
                |row| row.get(0),
            )
            .unwrap();
        assert!((distance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn distance_function_rejects_mismatched_lengths() {
        let tmp = tempfile::tempdir().unwrap();
        let conn = open_db(&tmp.path().join("t.db")).unwrap();
        let result: rusqlite::Result<f64> = conn.query_row(
            &format!("SELECT {DISTANCE_FN}(?1, ?2)"),
            [encode_vector(&[1.0, 0.0]), encode_vector(&[1.0])],
            |row| row.get(0),
        );
        assert!(result.is_err());
    }
}
