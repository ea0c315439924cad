use crate::api::BatchStore;
use crate::db::db::Db;
use crate::libs::batch::{BatchPage, BatchPatch, BatchRecord, NewBatch, ProductStatus};
use crate::libs::error::DashboardError;
use anyhow::Result;
use chrono::Local;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

const SELECT_COLUMNS: &str = "SELECT id, created_at, ubi_no, line, line_lead, product, packing_format, batch_number,
    product_status, start_time, end_time, employee_count, actual_units, target_units, total_time_seconds,
    takt_time_seconds, running_takt_seconds, target_delta, delta_percentage, is_locked
    FROM batch_details";

const INSERT_BATCH: &str = "INSERT INTO batch_details (
    created_at, ubi_no, line, line_lead, product, packing_format, batch_number,
    product_status, start_time, end_time, employee_count, actual_units, target_units
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

const UPDATE_BATCH: &str = "UPDATE batch_details SET
    product = ?2, product_status = ?3, start_time = ?4, end_time = ?5, employee_count = ?6,
    actual_units = ?7, target_units = ?8, total_time_seconds = ?9, takt_time_seconds = ?10,
    running_takt_seconds = ?11, target_delta = ?12, delta_percentage = ?13, is_locked = ?14
    WHERE id = ?1 AND is_locked = FALSE";

const DELETE_BATCH: &str = "DELETE FROM batch_details WHERE id = ?1 AND is_locked = FALSE";

const COUNT_BATCHES: &str = "SELECT COUNT(*) FROM batch_details";

const SELECT_LOCK_STATE: &str = "SELECT is_locked FROM batch_details WHERE id = ?1";

/// Batch store backed by the SQLite database in the data directory.
///
/// The connection sits behind a mutex so the store can be shared with the
/// auto-refresh task. No lock is held across an `.await`.
#[derive(Debug)]
pub struct LocalStore {
    pub(crate) conn: Mutex<Connection>,
    path: PathBuf,
}

impl LocalStore {
    pub fn new() -> Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    fn from_db(db: Db) -> Self {
        Self {
            conn: Mutex::new(db.conn),
            path: db.path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps a write that touched no row to `NotFound` or `Locked`.
    fn explain_rejection(conn: &Connection, id: i64) -> anyhow::Error {
        match conn.query_row(SELECT_LOCK_STATE, params![id], |row| row.get::<_, bool>(0)).optional() {
            Ok(Some(true)) => DashboardError::Locked(id).into(),
            Ok(_) => DashboardError::NotFound(id).into(),
            Err(e) => anyhow::Error::new(e).context(format!("failed to read lock state of batch {}", id)),
        }
    }
}

fn batch_from_row(row: &Row) -> rusqlite::Result<BatchRecord> {
    let status: String = row.get(8)?;
    let product_status = status
        .parse::<ProductStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(BatchRecord {
        id: row.get(0)?,
        created_at: row.get(1)?,
        ubi_no: row.get(2)?,
        line: row.get(3)?,
        line_lead: row.get(4)?,
        product: row.get(5)?,
        packing_format: row.get(6)?,
        batch_number: row.get(7)?,
        product_status,
        start_time: row.get(9)?,
        end_time: row.get(10)?,
        employee_count: row.get(11)?,
        actual_units: row.get(12)?,
        target_units: row.get(13)?,
        total_time_seconds: row.get(14)?,
        takt_time_seconds: row.get(15)?,
        running_takt_seconds: row.get(16)?,
        target_delta: row.get(17)?,
        delta_percentage: row.get(18)?,
        is_locked: row.get(19)?,
    })
}

impl BatchStore for LocalStore {
    async fn list(&self, page: u32, page_size: u32) -> Result<BatchPage> {
        let conn = self.conn.lock();
        let total_rows: i64 = conn.query_row(COUNT_BATCHES, [], |row| row.get(0))?;

        let offset = i64::from(page.max(1) - 1) * i64::from(page_size);
        let mut stmt = conn.prepare(&format!("{} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2", SELECT_COLUMNS))?;
        let records = stmt
            .query_map(params![page_size, offset], batch_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BatchPage {
            records,
            total_rows: u64::try_from(total_rows).unwrap_or(0),
        })
    }

    async fn get(&self, id: i64) -> Result<Option<BatchRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        Ok(stmt.query_row(params![id], batch_from_row).optional()?)
    }

    async fn create(&self, batch: &NewBatch) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            INSERT_BATCH,
            params![
                Local::now().naive_local(),
                batch.ubi_no,
                batch.line,
                batch.line_lead,
                batch.product,
                batch.packing_format,
                batch.batch_number,
                batch.product_status.as_str(),
                batch.start_time,
                batch.end_time,
                batch.employee_count,
                batch.actual_units,
                batch.target_units,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, batch_number = %batch.batch_number, "batch inserted");
        Ok(id)
    }

    async fn update(&self, id: i64, patch: &BatchPatch) -> Result<()> {
        let conn = self.conn.lock();
        let affected = conn.execute(
            UPDATE_BATCH,
            params![
                id,
                patch.product,
                patch.product_status.as_str(),
                patch.start_time,
                patch.end_time,
                patch.employee_count,
                patch.actual_units,
                patch.target_units,
                patch.total_time_seconds,
                patch.takt_time_seconds,
                patch.running_takt_seconds,
                patch.target_delta,
                patch.delta_percentage,
                patch.is_locked,
            ],
        )?;

        if affected == 0 {
            return Err(Self::explain_rejection(&conn, id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let affected = conn.execute(DELETE_BATCH, params![id])?;

        if affected == 0 {
            return Err(Self::explain_rejection(&conn, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reports_lock_state() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE batch_details (id INTEGER PRIMARY KEY, is_locked BOOLEAN NOT NULL)", [])
            .unwrap();
        conn.execute("INSERT INTO batch_details (id, is_locked) VALUES (1, TRUE)", []).unwrap();

        let locked = LocalStore::explain_rejection(&conn, 1);
        assert!(matches!(locked.downcast_ref::<DashboardError>(), Some(DashboardError::Locked(1))));
        let missing = LocalStore::explain_rejection(&conn, 2);
        assert!(matches!(missing.downcast_ref::<DashboardError>(), Some(DashboardError::NotFound(2))));
    }

    #[test]
    fn rejection_surfaces_query_errors() {
        let conn = Connection::open_in_memory().unwrap();

        let err = LocalStore::explain_rejection(&conn, 1);
        assert!(err.downcast_ref::<DashboardError>().is_none());
        assert!(err.downcast_ref::<rusqlite::Error>().is_some());
    }
}
