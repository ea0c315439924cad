use crate::db::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "taktline.db";

/// An open SQLite database with an up-to-date schema.
pub struct Db {
    pub conn: Connection,
    pub path: PathBuf,
}

impl Db {
    /// Opens the database in the application data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(&db_file_path)
    }

    /// Opens the database at `path`, applying pending migrations.
    pub fn open(path: &Path) -> Result<Db> {
        let mut conn = Self::open_without_migrations(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Opens the database at `path` as is, for inspecting the migration state.
    pub fn open_without_migrations(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path).with_context(|| format!("cannot open database {}", path.display()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}
