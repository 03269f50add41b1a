use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags};

use crate::db::connection::{open_db, prepare};
use crate::error::Result;

/// Where the index database lives.
///
/// The in-memory variant keeps an anchor connection open so the shared-cache
/// database survives between [`DatabaseDriver::open`] calls.
pub enum DatabaseDriver {
    File(PathBuf),
    InMemory { uri: String, _anchor: Connection },
}

impl DatabaseDriver {
    pub fn file(path: PathBuf) -> Self {
        Self::File(path)
    }

    /// Named shared-cache in-memory database. `name` must be unique per test.
    pub fn in_memory(name: &str) -> Result<Self> {
        let uri = format!("file:{name}?mode=memory&cache=shared");
        let anchor = open_uri(&uri)?;
        Ok(Self::InMemory {
            uri,
            _anchor: anchor,
        })
    }

    /// Whether an index has been created (nothing ingested yet otherwise).
    pub fn is_ready(&self) -> bool {
        match self {
            Self::File(path) => path.exists(),
            Self::InMemory { .. } => true,
        }
    }

    /// Open a new migrated connection, creating the database if needed.
    pub fn open(&self) -> Result<Connection> {
        match self {
            Self::File(path) => open_db(path),
            Self::InMemory { uri, .. } => open_uri(uri),
        }
    }
}

fn open_uri(uri: &str) -> Result<Connection> {
    let mut conn = Connection::open_with_flags(
        uri,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI,
    )?;
    prepare(&mut conn)?;
    Ok(conn)
}
