//! Versioned schema migrations for the local store.
//!
//! Each migration has a version, a name and a function that applies it inside
//! a transaction. Applied versions are recorded in the `migrations` table, so
//! opening the database repeatedly only runs what is new.
//!
//! ## Schema history
//!
//! 1. `create_batch_details`: batch records and the `created_at` index
//! 2. `add_reference_tables`: product baselines and employee pace factors

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        self.add_migration(1, "create_batch_details", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS batch_details (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    created_at TIMESTAMP NOT NULL,
                    ubi_no TEXT NOT NULL DEFAULT '',
                    line TEXT NOT NULL,
                    line_lead TEXT NOT NULL,
                    product TEXT NOT NULL,
                    packing_format TEXT NOT NULL,
                    batch_number TEXT NOT NULL,
                    product_status TEXT NOT NULL DEFAULT 'Unfinished',
                    start_time TEXT,
                    end_time TEXT,
                    employee_count INTEGER,
                    actual_units INTEGER NOT NULL DEFAULT 0,
                    target_units INTEGER NOT NULL DEFAULT 0,
                    total_time_seconds INTEGER NOT NULL DEFAULT 0,
                    takt_time_seconds REAL NOT NULL DEFAULT 0,
                    running_takt_seconds REAL NOT NULL DEFAULT 0,
                    target_delta INTEGER NOT NULL DEFAULT 0,
                    delta_percentage REAL NOT NULL DEFAULT 0,
                    is_locked BOOLEAN NOT NULL DEFAULT FALSE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_batch_details_created_at ON batch_details(created_at)", [])?;
            Ok(())
        });

        self.add_migration(2, "add_reference_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS products (
                    id INTEGER PRIMARY KEY,
                    product_name TEXT NOT NULL UNIQUE,
                    baseline_cycle_time REAL NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS employee_pace (
                    employee_count INTEGER PRIMARY KEY,
                    pace_adjustment_factor REAL NOT NULL
                )",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version, all in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e);
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
        }
        tx.commit()?;

        msg_debug!(Message::AllMigrationsCompleted);
        Ok(())
    }

    pub fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `(version, name, applied_at)` of every applied migration.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}

/// Reports the schema version through the message macros.
pub fn report_status(conn: &Connection) -> Result<()> {
    msg_info!(Message::DatabaseVersion(get_db_version(conn)?));
    if needs_migration(conn)? {
        msg_info!(Message::DatabaseNeedsUpdate);
    } else {
        msg_success!(Message::DatabaseUpToDate);
    }
    Ok(())
}
