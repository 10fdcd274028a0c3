//! SQLite catalog store for romdock
//!
//! The catalog holds title records, their save records, and the append-only
//! sync history. One SQLite file under the data root backs all three
//! tables; save rows cascade-delete with their owning title.
//!
//! # Examples
//!
//! ```rust
//! use romdock_catalog::SqliteCatalog;
//! use romdock_types::{CatalogStore, TitleFilter};
//!
//! let catalog = SqliteCatalog::open_in_memory().expect("catalog");
//! let titles = catalog.titles(&TitleFilter::default()).expect("query");
//! assert!(titles.is_empty());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use romdock_types::{Error, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

mod store;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS titles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    filename TEXT NOT NULL,
    path TEXT NOT NULL UNIQUE,
    size INTEGER NOT NULL DEFAULT 0,
    extension TEXT NOT NULL DEFAULT '',
    system TEXT NOT NULL DEFAULT 'Unknown',
    date_added TEXT NOT NULL,
    last_played TEXT,
    play_count INTEGER NOT NULL DEFAULT 0,
    favorite INTEGER NOT NULL DEFAULT 0,
    rating INTEGER NOT NULL DEFAULT 0,
    boxart TEXT,
    boxart_2d TEXT,
    boxart_3d TEXT,
    boxart_region TEXT,
    screenshot TEXT,
    banner TEXT,
    fanart TEXT,
    synced INTEGER NOT NULL DEFAULT 0,
    last_synced TEXT
);

CREATE INDEX IF NOT EXISTS idx_titles_system ON titles(system);
CREATE INDEX IF NOT EXISTS idx_titles_name ON titles(name);
CREATE INDEX IF NOT EXISTS idx_titles_favorite ON titles(favorite);

CREATE TABLE IF NOT EXISTS saves (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title_id INTEGER NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
    save_type TEXT NOT NULL,
    filename TEXT NOT NULL,
    local_path TEXT,
    device_path TEXT,
    size INTEGER NOT NULL DEFAULT 0,
    last_modified TEXT,
    last_synced TEXT,
    sync_direction TEXT,
    UNIQUE(title_id, filename)
);

CREATE INDEX IF NOT EXISTS idx_saves_title ON saves(title_id);

CREATE TABLE IF NOT EXISTS sync_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id TEXT NOT NULL,
    profile_name TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    operation TEXT NOT NULL,
    rom_count INTEGER NOT NULL DEFAULT 0,
    roms_synced INTEGER NOT NULL DEFAULT 0,
    roms_skipped INTEGER NOT NULL DEFAULT 0,
    roms_errored INTEGER NOT NULL DEFAULT 0,
    saves_copied INTEGER NOT NULL DEFAULT 0,
    saves_skipped INTEGER NOT NULL DEFAULT 0,
    bytes_moved INTEGER NOT NULL DEFAULT 0,
    duration_ms INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL,
    error_summary TEXT,
    details TEXT
);

CREATE INDEX IF NOT EXISTS idx_history_profile ON sync_history(profile_id);
";

/// SQLite-backed implementation of the catalog store contract
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open or create the catalog database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        debug!("Opened catalog at {}", path.display());
        Self::initialize(conn)
    }

    /// Open a private in-memory catalog, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(db_err)?;
        conn.execute_batch(SCHEMA_SQL).map_err(db_err)?;
        Ok(Self { conn })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

pub(crate) fn db_err(error: rusqlite::Error) -> Error {
    Error::catalog(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use romdock_types::{CatalogStore, NewSave, NewTitle};

    fn new_title(name: &str, path: &str) -> NewTitle {
        NewTitle {
            name: name.to_string(),
            filename: format!("{name}.nes"),
            path: path.into(),
            size: 1024,
            extension: ".nes".to_string(),
            system: "Nintendo Entertainment System".to_string(),
            date_added: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_open_creates_schema() {
        let temp = tempfile::TempDir::new().unwrap();
        let catalog = SqliteCatalog::open(temp.path().join("nested/romdock.db")).unwrap();
        assert_eq!(catalog.library_status().unwrap().total, 0);
    }

    #[test]
    fn test_save_rows_cascade_with_title() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let id = catalog.add_title(&new_title("Game", "/library/Game.nes")).unwrap();
        catalog
            .upsert_save(&NewSave {
                title_id: id,
                save_type: "SRAM".to_string(),
                filename: "Game.srm".to_string(),
                local_path: Some("/saves/1/Game.srm".into()),
                device_path: None,
                size: 8192,
                last_modified: None,
                last_synced: None,
                direction: None,
            })
            .unwrap();
        assert_eq!(catalog.saves_for(id).unwrap().len(), 1);

        catalog
            .conn()
            .execute("DELETE FROM titles WHERE id = ?", [id])
            .unwrap();
        assert!(catalog.saves_for(id).unwrap().is_empty());
    }
}
