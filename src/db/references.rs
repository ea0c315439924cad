use crate::api::{Product, ReferenceData};
use crate::db::batches::LocalStore;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use rusqlite::{params, OptionalExtension};

const SELECT_PRODUCTS: &str = "SELECT id, product_name, baseline_cycle_time FROM products ORDER BY product_name";

const UPSERT_PRODUCT: &str = "INSERT INTO products (product_name, baseline_cycle_time) VALUES (?1, ?2)
    ON CONFLICT(product_name) DO UPDATE SET baseline_cycle_time = excluded.baseline_cycle_time";

const DELETE_PRODUCT: &str = "DELETE FROM products WHERE product_name = ?1";

const SELECT_PACE: &str = "SELECT pace_adjustment_factor FROM employee_pace WHERE employee_count = ?1";

const SELECT_ALL_PACE: &str = "SELECT employee_count, pace_adjustment_factor FROM employee_pace ORDER BY employee_count";

const UPSERT_PACE: &str = "INSERT INTO employee_pace (employee_count, pace_adjustment_factor) VALUES (?1, ?2)
    ON CONFLICT(employee_count) DO UPDATE SET pace_adjustment_factor = excluded.pace_adjustment_factor";

const DELETE_PACE: &str = "DELETE FROM employee_pace WHERE employee_count = ?1";

impl ReferenceData for LocalStore {
    async fn products(&self) -> Result<Vec<Product>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_PRODUCTS)?;
        let products = stmt
            .query_map([], |row| {
                Ok(Product {
                    id: row.get(0)?,
                    product_name: row.get(1)?,
                    baseline_cycle_time: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    async fn pace_factor(&self, employee_count: u32) -> Result<Option<f64>> {
        let conn = self.conn.lock();
        Ok(conn.query_row(SELECT_PACE, params![employee_count], |row| row.get(0)).optional()?)
    }
}

/// Maintenance of the reference tables, only available on the local store.
impl LocalStore {
    /// Adds a product or changes its baseline cycle time.
    pub fn save_product(&self, product_name: &str, baseline_cycle_time: f64) -> Result<()> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(msg_error_anyhow!(Message::ProductNameRequired));
        }
        if !baseline_cycle_time.is_finite() || baseline_cycle_time <= 0.0 {
            return Err(msg_error_anyhow!(Message::InvalidCycleTime(baseline_cycle_time)));
        }
        self.conn.lock().execute(UPSERT_PRODUCT, params![product_name, baseline_cycle_time])?;
        Ok(())
    }

    pub fn remove_product(&self, product_name: &str) -> Result<()> {
        let affected = self.conn.lock().execute(DELETE_PRODUCT, params![product_name.trim()])?;
        if affected == 0 {
            return Err(msg_error_anyhow!(Message::ProductNotFound(product_name.to_string())));
        }
        Ok(())
    }

    /// Stores the raw factor as entered; percentages are normalized when metrics are computed.
    pub fn save_pace(&self, employee_count: u32, factor: f64) -> Result<()> {
        if employee_count == 0 {
            return Err(msg_error_anyhow!(Message::InvalidPaceCount(employee_count)));
        }
        if !factor.is_finite() || factor <= 0.0 {
            return Err(msg_error_anyhow!(Message::InvalidPaceFactor(factor)));
        }
        self.conn.lock().execute(UPSERT_PACE, params![employee_count, factor])?;
        Ok(())
    }

    pub fn remove_pace(&self, employee_count: u32) -> Result<()> {
        let affected = self.conn.lock().execute(DELETE_PACE, params![employee_count])?;
        if affected == 0 {
            return Err(msg_error_anyhow!(Message::PaceNotFound(employee_count)));
        }
        Ok(())
    }

    pub fn pace_table(&self) -> Result<Vec<(u32, f64)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ALL_PACE)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
